mod badge;
mod notify;

pub use badge::BadgeRenderer;
pub use notify::NotificationTrigger;
