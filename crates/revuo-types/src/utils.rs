//! Small helpers shared across the server and adapters.

use rand::Rng;

/// Characters safe for generated identifiers and codes. No look-alike
/// pairs (0/O, 1/l/I), so a code survives being read out loud.
const SAFE: &[u8] = b"abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generate a random confirmation code of `len` characters from the SAFE set.
pub fn random_code(len: usize) -> String {
	let mut rng = rand::rng();
	(0..len).map(|_| SAFE[rng.random_range(0..SAFE.len())] as char).collect()
}

/// Derive a default handle from an email address: the local part, lowercased,
/// with characters outside `[a-z0-9._-]` dropped.
pub fn derive_handle_from_email(email: &str) -> String {
	let local = email.split('@').next().unwrap_or(email);
	local
		.chars()
		.filter_map(|c| match c {
			'a'..='z' | '0'..='9' | '.' | '_' | '-' => Some(c),
			'A'..='Z' => Some(c.to_ascii_lowercase()),
			_ => None,
		})
		.collect()
}

/// Basic shape check for an email address: one '@', non-empty local part and
/// domain, and a dot somewhere in the domain.
pub fn check_email(email: &str) -> bool {
	let Some((local, domain)) = email.split_once('@') else { return false };
	!local.is_empty()
		&& !domain.is_empty()
		&& !domain.starts_with('.')
		&& !domain.ends_with('.')
		&& domain.contains('.')
		&& !email.contains(char::is_whitespace)
}

/// Slug shape check: lowercase letters, digits and hyphens, non-empty.
pub fn check_slug(slug: &str) -> bool {
	!slug.is_empty() && slug.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9' | '-'))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_random_code() {
		let code = random_code(8);
		assert_eq!(code.len(), 8);
		assert!(code.bytes().all(|b| SAFE.contains(&b)));
		// Two draws colliding would mean a broken generator
		assert_ne!(random_code(16), random_code(16));
	}

	#[test]
	fn test_derive_handle() {
		assert_eq!(derive_handle_from_email("Jane.Doe@example.com"), "jane.doe");
		assert_eq!(derive_handle_from_email("a+tag@example.com"), "atag");
		assert_eq!(derive_handle_from_email("user_1@sub.example.org"), "user_1");
	}

	#[test]
	fn test_check_email() {
		assert!(check_email("user@example.com"));
		assert!(!check_email("user"));
		assert!(!check_email("@example.com"));
		assert!(!check_email("user@"));
		assert!(!check_email("user@example"));
		assert!(!check_email("us er@example.com"));
	}

	#[test]
	fn test_check_slug() {
		assert!(check_slug("sci-fi"));
		assert!(check_slug("drama2"));
		assert!(!check_slug(""));
		assert!(!check_slug("Sci-Fi"));
		assert!(!check_slug("rock&roll"));
	}
}

// vim: ts=4
