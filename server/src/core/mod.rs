pub mod app;
pub mod perm;
pub mod route_auth;

// vim: ts=4
