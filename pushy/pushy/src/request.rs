use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{NotificationOptions, PushOptions};

const TOPIC_PREFIX: &str = "/topics/";

/// Request body of `POST /push`. Exactly one of `to` and `tokens` is set.
#[derive(Debug, Serialize)]
pub(crate) struct PushRequest<'a, D: ?Sized> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) to: Option<Cow<'a, str>>,
    pub(crate) data: &'a D,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tokens: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) time_to_live: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) notification: Option<&'a NotificationOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) content_available: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) mutable_content: Option<bool>,
}

impl<'a, D: ?Sized> PushRequest<'a, D> {
    /// An empty token list is left out of the body.
    pub(crate) fn devices(tokens: &'a [String], data: &'a D) -> Self {
        Self::bare(None, (!tokens.is_empty()).then(|| tokens), data)
    }

    pub(crate) fn topic(topic: &'a str, data: &'a D) -> Self {
        Self::bare(Some(normalize_topic(topic)), None, data)
    }

    fn bare(to: Option<Cow<'a, str>>, tokens: Option<&'a [String]>, data: &'a D) -> Self {
        Self {
            to,
            data,
            tokens,
            time_to_live: None,
            notification: None,
            content_available: None,
            mutable_content: None,
        }
    }

    /// Copies optional fields. Nothing is copied without options.
    pub(crate) fn with_options(mut self, options: Option<&'a PushOptions>) -> Self {
        if let Some(o) = options {
            self.content_available = o.content_available;
            self.mutable_content = o.mutable_content;
            self.notification = o.notification.as_ref();
            self.time_to_live = o.time_to_live;
        }
        self
    }
}

/// Prepends `/topics/` unless the topic already starts with it.
pub(crate) fn normalize_topic(topic: &str) -> Cow<'_, str> {
    if topic.starts_with(TOPIC_PREFIX) {
        Cow::Borrowed(topic)
    } else {
        Cow::Owned(format!("{TOPIC_PREFIX}{topic}"))
    }
}

/// Pushy API response. <https://pushy.me/docs/api/send-notifications>
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Response {
    /// Push identifier, present on success.
    pub id: Option<String>,
    /// Whether the push was accepted.
    pub success: Option<bool>,
    /// Error message, present on failure.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::HashMap;

    use serde_json::json;

    fn tokens() -> Vec<String> {
        vec!["1".to_string(), "2".to_string(), "3".to_string()]
    }

    #[test]
    fn t_normalize_topic() {
        assert_eq!("/topics/foobar", normalize_topic("foobar"));
        assert_eq!("/topics/foobar", normalize_topic("/topics/foobar"));
        assert_eq!("/topics/", normalize_topic(""));
        assert_eq!("/topics/topics/foobar", normalize_topic("topics/foobar"));
    }

    #[test]
    fn t_devices_without_options() -> Result<(), serde_json::Error> {
        let tokens = tokens();
        let data = HashMap::from([("foo", "bar")]);
        let request = PushRequest::devices(&tokens, &data).with_options(None);
        assert_eq!(
            json!({"data": {"foo": "bar"}, "tokens": ["1", "2", "3"]}),
            serde_json::to_value(&request)?
        );
        Ok(())
    }

    #[test]
    fn t_devices_without_tokens() -> Result<(), serde_json::Error> {
        let data = json!({});
        let request = PushRequest::devices(&[], &data).with_options(None);
        assert_eq!(json!({"data": {}}), serde_json::to_value(&request)?);
        Ok(())
    }

    #[test]
    fn t_topic_with_options() -> Result<(), serde_json::Error> {
        let data = json!({"foo": "bar"});
        let options = PushOptions::default()
            .content_available(true)
            .mutable_content(true)
            .time_to_live(100)
            .notification(NotificationOptions::default().body("test body").badge(1));
        let request = PushRequest::topic("/topics/foobar", &data).with_options(Some(&options));
        assert_eq!(
            json!({
                "to": "/topics/foobar",
                "data": {"foo": "bar"},
                "time_to_live": 100,
                "notification": {"body": "test body", "badge": 1},
                "content_available": true,
                "mutable_content": true,
            }),
            serde_json::to_value(&request)?
        );
        Ok(())
    }

    #[test]
    fn t_explicit_false_is_kept() -> Result<(), serde_json::Error> {
        let data = json!(null);
        let options = PushOptions::default().content_available(false);
        let request = PushRequest::topic("foobar", &data).with_options(Some(&options));
        assert_eq!(
            json!({"to": "/topics/foobar", "data": null, "content_available": false}),
            serde_json::to_value(&request)?
        );
        Ok(())
    }

    #[test]
    fn t_empty_options() -> Result<(), serde_json::Error> {
        let data = json!({});
        let options = PushOptions::default();
        let request = PushRequest::topic("foobar", &data).with_options(Some(&options));
        assert_eq!(
            json!({"to": "/topics/foobar", "data": {}}),
            serde_json::to_value(&request)?
        );
        Ok(())
    }

    #[test]
    fn t_response() -> Result<(), serde_json::Error> {
        let res: Response = serde_json::from_str(r#"{"success":true, "id":"5742ea5dacf3a92e17ba7126"}"#)?;
        assert_eq!(Some("5742ea5dacf3a92e17ba7126".to_string()), res.id);
        assert_eq!(Some(true), res.success);
        assert!(res.error.is_none());

        let res: Response = serde_json::from_str(r#"{"error":"test error"}"#)?;
        assert_eq!(Some("test error".to_string()), res.error);
        assert!(res.id.is_none());

        let res: Response = serde_json::from_str(r#"{"error":null,"info":{"devices":3}}"#)?;
        assert!(res.error.is_none());
        Ok(())
    }
}
