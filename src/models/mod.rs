pub mod awards;
pub mod conference;
pub mod config;
pub mod member;
pub mod newsletter;

pub use awards::AwardNomination;
pub use conference::{ConferenceRegistration, PaymentStatus};
pub use config::{default_data_dir, AppConfig, LookupPolicy};
pub use member::{Address, Member, MembershipType};
pub use newsletter::NewsletterSubscriber;
