//! Notification preference fan-out.
//!
//! Delivery itself belongs to the push/e-mail/SMS providers; this module only
//! decides which channels a notice should go out on.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationChannel {
    InApp,
    Email,
    Sms,
    Push,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeCategory {
    ListingUpdates,
    BookingUpdates,
    Messages,
    Promotions,
}

/// Per-user delivery settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NotificationPreferences {
    pub email: bool,
    pub sms: bool,
    pub push: bool,
    pub listing_updates: bool,
    pub booking_updates: bool,
    pub messages: bool,
    pub promotions: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            email: true,
            sms: false,
            push: true,
            listing_updates: true,
            booking_updates: true,
            messages: true,
            promotions: false,
        }
    }
}

impl NotificationPreferences {
    pub fn wants(&self, category: NoticeCategory) -> bool {
        match category {
            NoticeCategory::ListingUpdates => self.listing_updates,
            NoticeCategory::BookingUpdates => self.booking_updates,
            NoticeCategory::Messages => self.messages,
            NoticeCategory::Promotions => self.promotions,
        }
    }
}

/// Channels a notice of `category` is delivered on. The in-app inbox always
/// receives it; external transports only when the user opted into the category.
pub fn fan_out(
    preferences: &NotificationPreferences,
    category: NoticeCategory,
) -> Vec<NotificationChannel> {
    let mut channels = vec![NotificationChannel::InApp];
    if !preferences.wants(category) {
        return channels;
    }

    if preferences.email {
        channels.push(NotificationChannel::Email);
    }
    if preferences.sms {
        channels.push(NotificationChannel::Sms);
    }
    if preferences.push {
        channels.push(NotificationChannel::Push);
    }
    channels
}
