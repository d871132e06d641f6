pub mod sender;

/// An outgoing mail, already rendered
#[derive(Clone, Debug)]
pub struct EmailMessage {
	pub to: String,
	pub subject: String,
	pub text_body: String,
}

// vim: ts=4
