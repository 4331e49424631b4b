//! UDP relay module for DishaIO

pub mod mailbox;
pub mod udp_publisher;
pub mod udp_subscriber;
pub mod wire;

pub use mailbox::Mailbox;
pub use udp_publisher::UdpPublisher;
pub use udp_subscriber::{SubscriptionHandle, UdpSubscriber};
pub use wire::Serializer;
