use std::borrow::Cow;

use serde::Serialize;

/// Optional settings for a push. <https://pushy.me/docs/api/send-notifications>
///
/// Fields left as [`None`] are omitted from the request, so `Some(false)` or `Some(0)`
/// are sent as-is and are not the same as "not specified".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PushOptions {
    /// Seconds Pushy should keep trying to deliver the notification.
    pub time_to_live: Option<i64>,
    /// iOS notification block.
    pub notification: Option<NotificationOptions>,
    /// Wake the app in the background on iOS.
    pub content_available: Option<bool>,
    /// Let a notification service extension modify the notification on iOS.
    pub mutable_content: Option<bool>,
}

impl PushOptions {
    /// Sets time to live in seconds.
    ///
    /// ```
    /// # use pushy::PushOptions;
    /// let options = PushOptions::default().time_to_live(100);
    /// assert_eq!(Some(100), options.time_to_live);
    /// ```
    pub fn time_to_live(mut self, seconds: i64) -> Self {
        self.time_to_live = Some(seconds);
        self
    }

    /// Sets notification block.
    pub fn notification(mut self, notification: NotificationOptions) -> Self {
        self.notification = Some(notification);
        self
    }

    /// Sets content available flag.
    pub fn content_available(mut self, content_available: bool) -> Self {
        self.content_available = Some(content_available);
        self
    }

    /// Sets mutable content flag.
    pub fn mutable_content(mut self, mutable_content: bool) -> Self {
        self.mutable_content = Some(mutable_content);
        self
    }

    /// Whether no option is set at all.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// iOS notification arguments. <https://pushy.me/docs/api/send-notifications>
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct NotificationOptions {
    /// Notification text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Number displayed on the app icon.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<i64>,
    /// Sound file in the app bundle, or `default`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    /// Notification title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Notification category for actionable notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Key of a localized body string.
    #[serde(rename = "loc_key", skip_serializing_if = "Option::is_none")]
    pub localization_key: Option<String>,
    /// Format arguments for the localized body string, in order.
    #[serde(rename = "loc_args", skip_serializing_if = "Option::is_none")]
    pub localization_args: Option<Vec<String>>,
    /// Key of a localized title string.
    #[serde(rename = "title_loc_key", skip_serializing_if = "Option::is_none")]
    pub title_localization_key: Option<String>,
    /// Format arguments for the localized title string, in order.
    #[serde(rename = "title_loc_args", skip_serializing_if = "Option::is_none")]
    pub title_localization_args: Option<Vec<String>>,
}

impl NotificationOptions {
    /// Sets body.
    ///
    /// ```
    /// # use pushy::NotificationOptions;
    /// let n = NotificationOptions::default().body("test body").badge(1);
    /// assert_eq!(Some("test body".to_string()), n.body);
    /// assert_eq!(Some(1), n.badge);
    /// ```
    pub fn body<'a, T: Into<Cow<'a, str>>>(mut self, body: T) -> Self {
        self.body = Some(body.into().into_owned());
        self
    }

    /// Sets badge.
    pub fn badge(mut self, badge: i64) -> Self {
        self.badge = Some(badge);
        self
    }

    /// Sets sound.
    pub fn sound<'a, T: Into<Cow<'a, str>>>(mut self, sound: T) -> Self {
        self.sound = Some(sound.into().into_owned());
        self
    }

    /// Sets title.
    pub fn title<'a, T: Into<Cow<'a, str>>>(mut self, title: T) -> Self {
        self.title = Some(title.into().into_owned());
        self
    }

    /// Sets category.
    pub fn category<'a, T: Into<Cow<'a, str>>>(mut self, category: T) -> Self {
        self.category = Some(category.into().into_owned());
        self
    }

    /// Sets localization key and its arguments.
    pub fn localization<'a, T, A>(mut self, key: T, args: A) -> Self
    where
        T: Into<Cow<'a, str>>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        self.localization_key = Some(key.into().into_owned());
        self.localization_args = Some(args.into_iter().map(Into::into).collect());
        self
    }

    /// Sets title localization key and its arguments.
    pub fn title_localization<'a, T, A>(mut self, key: T, args: A) -> Self
    where
        T: Into<Cow<'a, str>>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        self.title_localization_key = Some(key.into().into_owned());
        self.title_localization_args = Some(args.into_iter().map(Into::into).collect());
        self
    }
}
