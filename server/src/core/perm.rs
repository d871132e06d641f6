//! Permission evaluator
//!
//! Authorization is decided by rules: explicit, ordered slices of named
//! predicates over `(caller, method, target author)`, evaluated with
//! short-circuit OR. Predicates are pure functions; none of them touches
//! the store or mutates anything.
//!
//! A denied check surfaces as `Unauthorized` when there is no caller at
//! all, and as `PermissionDenied` when there is one without the privilege.

use axum::http::Method;

use crate::prelude::*;

type Predicate = fn(Option<&AuthCtx>, &Method, Option<i64>) -> bool;

pub struct Rule {
	pub name: &'static str,
	preds: &'static [Predicate],
}

// Predicates //
//************//
fn read_only_safe(_auth: Option<&AuthCtx>, method: &Method, _author_id: Option<i64>) -> bool {
	*method == Method::GET || *method == Method::HEAD || *method == Method::OPTIONS
}

fn is_authenticated(auth: Option<&AuthCtx>, _method: &Method, _author_id: Option<i64>) -> bool {
	auth.is_some()
}

fn is_owner(auth: Option<&AuthCtx>, _method: &Method, author_id: Option<i64>) -> bool {
	match (auth, author_id) {
		(Some(auth), Some(author_id)) => auth.user_id == author_id,
		_ => false,
	}
}

fn has_moderator_role(auth: Option<&AuthCtx>, _method: &Method, _author_id: Option<i64>) -> bool {
	auth.is_some_and(AuthCtx::is_moderator)
}

fn has_admin_role(auth: Option<&AuthCtx>, _method: &Method, _author_id: Option<i64>) -> bool {
	auth.is_some_and(AuthCtx::is_admin)
}

fn is_staff(auth: Option<&AuthCtx>, _method: &Method, _author_id: Option<i64>) -> bool {
	auth.is_some_and(|a| a.is_staff)
}

fn is_superuser(auth: Option<&AuthCtx>, _method: &Method, _author_id: Option<i64>) -> bool {
	auth.is_some_and(|a| a.is_superuser)
}

// Rules //
//*******//
/// Titles, categories, genres: anyone reads, only the staff flag mutates.
/// The role axis does not apply here.
pub const STAFF_OR_READ_ONLY: Rule = Rule {
	name: "staff-or-read-only",
	preds: &[read_only_safe, is_staff],
};

/// Reviews and comments: anyone reads, the author or moderation mutates.
/// The staff flag grants nothing here; moderation is the role axis plus
/// the superuser flag.
pub const AUTHOR_OR_MODERATION: Rule = Rule {
	name: "author-or-moderation",
	preds: &[read_only_safe, is_owner, has_moderator_role, has_admin_role, is_superuser],
};

/// User administration
pub const SUPERUSER_ONLY: Rule = Rule { name: "superuser-only", preds: &[is_superuser] };

/// Review/comment creation: any authenticated caller
pub const AUTHENTICATED: Rule = Rule { name: "authenticated", preds: &[is_authenticated] };

/// Evaluate a rule; `author_id` is the author of the target object, when
/// the rule cares about ownership.
pub fn check(
	rule: &Rule,
	auth: Option<&AuthCtx>,
	method: &Method,
	author_id: Option<i64>,
) -> RvResult<()> {
	if rule.preds.iter().any(|p| p(auth, method, author_id)) {
		return Ok(());
	}
	debug!("Permission denied by rule {}", rule.name);
	match auth {
		None => Err(Error::Unauthorized),
		Some(_) => Err(Error::PermissionDenied),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn ctx(role: Role, is_staff: bool, is_superuser: bool) -> AuthCtx {
		AuthCtx { user_id: 1, handle: "alice".into(), role, is_staff, is_superuser }
	}

	#[test]
	fn test_read_only_safe() {
		assert!(read_only_safe(None, &Method::GET, None));
		assert!(read_only_safe(None, &Method::HEAD, None));
		assert!(!read_only_safe(None, &Method::POST, None));
		assert!(!read_only_safe(None, &Method::DELETE, None));
	}

	#[test]
	fn test_is_owner() {
		let auth = ctx(Role::User, false, false);
		assert!(is_owner(Some(&auth), &Method::PATCH, Some(1)));
		assert!(!is_owner(Some(&auth), &Method::PATCH, Some(2)));
		assert!(!is_owner(Some(&auth), &Method::PATCH, None));
		assert!(!is_owner(None, &Method::PATCH, Some(1)));
	}

	#[test]
	fn test_role_predicates() {
		let user = ctx(Role::User, false, false);
		let moderator = ctx(Role::Moderator, false, false);
		let admin = ctx(Role::Admin, false, false);

		assert!(!has_moderator_role(Some(&user), &Method::DELETE, None));
		assert!(has_moderator_role(Some(&moderator), &Method::DELETE, None));
		// Admin role implies moderator powers
		assert!(has_moderator_role(Some(&admin), &Method::DELETE, None));
		assert!(!has_admin_role(Some(&moderator), &Method::DELETE, None));
		assert!(has_admin_role(Some(&admin), &Method::DELETE, None));
	}

	#[test]
	fn test_staff_or_read_only() {
		let user = ctx(Role::User, false, false);
		let staff = ctx(Role::User, true, false);
		let admin = ctx(Role::Admin, false, false);
		let superuser = ctx(Role::User, false, true);

		// Reads are open, even anonymously
		assert!(check(&STAFF_OR_READ_ONLY, None, &Method::GET, None).is_ok());
		assert!(check(&STAFF_OR_READ_ONLY, Some(&user), &Method::GET, None).is_ok());

		// Mutations need the staff flag, nothing else
		assert!(matches!(
			check(&STAFF_OR_READ_ONLY, None, &Method::POST, None),
			Err(Error::Unauthorized)
		));
		assert!(matches!(
			check(&STAFF_OR_READ_ONLY, Some(&user), &Method::POST, None),
			Err(Error::PermissionDenied)
		));
		assert!(check(&STAFF_OR_READ_ONLY, Some(&staff), &Method::POST, None).is_ok());

		// The admin role and the superuser flag are not the staff flag
		assert!(matches!(
			check(&STAFF_OR_READ_ONLY, Some(&admin), &Method::DELETE, None),
			Err(Error::PermissionDenied)
		));
		assert!(matches!(
			check(&STAFF_OR_READ_ONLY, Some(&superuser), &Method::POST, None),
			Err(Error::PermissionDenied)
		));
	}

	#[test]
	fn test_author_or_moderation() {
		let author = ctx(Role::User, false, false);
		let mut other = ctx(Role::User, false, false);
		other.user_id = 2;
		let mut moderator = ctx(Role::Moderator, false, false);
		moderator.user_id = 3;
		let mut staff = ctx(Role::User, true, false);
		staff.user_id = 4;
		let mut superuser = ctx(Role::User, false, true);
		superuser.user_id = 5;

		assert!(check(&AUTHOR_OR_MODERATION, Some(&author), &Method::PATCH, Some(1)).is_ok());
		assert!(matches!(
			check(&AUTHOR_OR_MODERATION, Some(&other), &Method::PATCH, Some(1)),
			Err(Error::PermissionDenied)
		));
		assert!(check(&AUTHOR_OR_MODERATION, Some(&moderator), &Method::DELETE, Some(1)).is_ok());
		assert!(check(&AUTHOR_OR_MODERATION, Some(&superuser), &Method::DELETE, Some(1)).is_ok());

		// The staff flag is a content-catalog power, not a moderation power
		assert!(matches!(
			check(&AUTHOR_OR_MODERATION, Some(&staff), &Method::DELETE, Some(1)),
			Err(Error::PermissionDenied)
		));
		assert!(matches!(
			check(&AUTHOR_OR_MODERATION, None, &Method::DELETE, Some(1)),
			Err(Error::Unauthorized)
		));
	}

	#[test]
	fn test_superuser_only() {
		let admin = ctx(Role::Admin, true, false);
		let superuser = ctx(Role::User, false, true);

		// Even GET is closed to non-superusers here
		assert!(matches!(
			check(&SUPERUSER_ONLY, Some(&admin), &Method::GET, None),
			Err(Error::PermissionDenied)
		));
		assert!(check(&SUPERUSER_ONLY, Some(&superuser), &Method::GET, None).is_ok());
		assert!(matches!(
			check(&SUPERUSER_ONLY, None, &Method::GET, None),
			Err(Error::Unauthorized)
		));
	}
}

// vim: ts=4
