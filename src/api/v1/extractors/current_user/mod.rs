/*!
 * Current user extractor
 *
 * Responsibility:
 * - gate が request attributes に載せた identity (`user`) を handler に提供する
 *
 * Public API:
 * - CurrentUser
 */

mod core;

pub use core::CurrentUser;
