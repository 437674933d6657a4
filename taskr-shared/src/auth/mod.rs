/// Authentication and authorization utilities
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`token`]: Session token generation and hashing
/// - [`session`]: Cookie plumbing and the request-scoped [`session::Identity`]
/// - [`policy`]: The ownership/role predicate for task mutation
///
/// # Security Notes
///
/// - Passwords are hashed with Argon2id; verification failure is reported
///   with the same message as an unknown user.
/// - Session tokens are random and stored only as SHA-256 digests; lookup
///   is by exact digest match.

pub mod password;
pub mod policy;
pub mod session;
pub mod token;
