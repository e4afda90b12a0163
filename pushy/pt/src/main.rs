#![deny(
    missing_docs,
    missing_debug_implementations,
    missing_copy_implementations,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

//! pt is a command line application based on Pushy API.
//!
//! If Pushy secret API key is "key",
//!
//! ```
//! $ pt -k key -d '{"message":"hello"}' devices -t a6345d0278adc55d3474f5
//! $ pt -k key -d '{"message":"hello"}' topic news
//! ```
//!
//! Or you can set environment variables instead, and pipe data from standard input,
//!
//! ```
//! $ export PUSHY_API_KEY=key
//! $ echo '{"message":"hello"}' | pt --title hello --badge 1 topic news
//! ```
//!
//! For more information,
//!
//! ```
//! $ pt -h
//! ```

use std::time::Duration;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use log::{debug, Level};
use logging_timer::{finish, stimer};
use serde_json::Value;

use pushy::{Client, NotificationOptions, PushOptions};

#[doc(hidden)]
#[derive(Debug, Parser)]
#[clap(about, author, version)]
struct Opts {
    /// Your secret API key. <https://pushy.me/docs/api/authentication>
    #[clap(short = 'k', long, env = "PUSHY_API_KEY")]
    api_key: String,
    /// JSON payload delivered to your app, read from standard input when omitted.
    #[clap(short, long)]
    data: Option<String>,
    /// Give up after this many seconds.
    #[clap(long, env = "PUSHY_TIMEOUT", default_value_t = 30)]
    timeout: u64,
    /// Seconds Pushy should keep trying to deliver the notification.
    #[clap(long)]
    time_to_live: Option<i64>,
    /// Wake your app in the background on iOS, --content-available=false to send false.
    #[clap(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    content_available: Option<bool>,
    /// Let your notification service extension modify the notification on iOS,
    /// --mutable-content=false to send false.
    #[clap(long, num_args = 0..=1, require_equals = true, default_missing_value = "true")]
    mutable_content: Option<bool>,
    /// iOS notification title.
    #[clap(long)]
    title: Option<String>,
    /// iOS notification body.
    #[clap(long)]
    body: Option<String>,
    /// iOS app icon badge.
    #[clap(long, allow_hyphen_values = true)]
    badge: Option<i64>,
    /// iOS notification sound e.g. default, ping.aiff.
    #[clap(long)]
    sound: Option<String>,
    /// iOS notification category.
    #[clap(long)]
    category: Option<String>,
    /// Key of a localized body string.
    #[clap(long)]
    loc_key: Option<String>,
    /// Arguments of localized body string, repeat for more.
    #[clap(long)]
    loc_args: Vec<String>,
    /// Key of a localized title string.
    #[clap(long)]
    title_loc_key: Option<String>,
    /// Arguments of localized title string, repeat for more.
    #[clap(long)]
    title_loc_args: Vec<String>,
    /// Verbose.
    #[clap(short, long)]
    verbose: bool,
    #[clap(subcommand)]
    target: Target,
}

#[doc(hidden)]
#[derive(Debug, Subcommand)]
enum Target {
    /// Push to devices.
    Devices {
        /// Device token, repeat for more.
        #[clap(short = 't', long = "token", required = true)]
        tokens: Vec<String>,
    },
    /// Push to subscribers of a topic, with or without the /topics/ prefix.
    Topic {
        /// Topic name.
        topic: String,
    },
}

fn non_empty(v: &[String]) -> Option<Vec<String>> {
    (!v.is_empty()).then(|| v.to_vec())
}

impl Opts {
    fn notification(&self) -> Option<NotificationOptions> {
        let n = NotificationOptions {
            body: self.body.clone(),
            badge: self.badge,
            sound: self.sound.clone(),
            title: self.title.clone(),
            category: self.category.clone(),
            localization_key: self.loc_key.clone(),
            localization_args: non_empty(&self.loc_args),
            title_localization_key: self.title_loc_key.clone(),
            title_localization_args: non_empty(&self.title_loc_args),
        };
        (n != NotificationOptions::default()).then(|| n)
    }

    fn push_options(&self) -> Option<PushOptions> {
        let o = PushOptions {
            time_to_live: self.time_to_live,
            notification: self.notification(),
            content_available: self.content_available,
            mutable_content: self.mutable_content,
        };
        (!o.is_empty()).then(|| o)
    }
}

fn parse_data(s: &str) -> anyhow::Result<Value> {
    serde_json::from_str(s).with_context(|| format!("data is not JSON: {s}"))
}

#[doc(hidden)]
fn main() -> anyhow::Result<()> {
    use std::io::Read as _;

    pretty_env_logger::init();

    let opts: Opts = Opts::parse();

    let data = if let Some(ref d) = opts.data {
        parse_data(d)?
    } else if atty::isnt(atty::Stream::Stdin) {
        debug!("load data from standard input");
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        parse_data(&buf)?
    } else {
        Value::Object(Default::default())
    };
    let options = opts.push_options();

    let client = Client::new(&opts.api_key, Duration::from_secs(opts.timeout));

    let tmr = stimer!(Level::Debug; "PUSH");
    let res = match opts.target {
        Target::Devices { ref tokens } => {
            client.push_to_devices(tokens, &data, options.as_ref(), None)
        }
        Target::Topic { ref topic } => client.push_to_topic(topic, &data, options.as_ref(), None),
    };
    finish!(tmr);

    let res = res.map_err(|e| {
        let code = e.code();
        anyhow::Error::new(e).context(code)
    })?;
    if opts.verbose {
        println!("{res:?}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use crate::{parse_data, Opts, Target};

    #[test]
    fn test_devices() {
        let parsed = Opts::try_parse_from(vec!["pt", "-k", "key", "devices", "-t", "1", "-t", "2"])
            .unwrap();
        assert_eq!("key", parsed.api_key);
        assert_eq!(30, parsed.timeout);
        assert!(parsed.push_options().is_none());
        match parsed.target {
            Target::Devices { tokens } => assert_eq!(vec!["1", "2"], tokens),
            t => panic!("unexpected target {t:?}"),
        }
    }

    #[test]
    fn test_devices_requires_token() {
        assert!(Opts::try_parse_from(vec!["pt", "-k", "key", "devices"]).is_err());
    }

    #[test]
    fn test_topic() {
        let parsed =
            Opts::try_parse_from(vec!["pt", "-k", "key", "-d", r#"{"foo":"bar"}"#, "topic", "foobar"])
                .unwrap();
        assert_eq!(Some(r#"{"foo":"bar"}"#.to_string()), parsed.data);
        match parsed.target {
            Target::Topic { topic } => assert_eq!("foobar", topic),
            t => panic!("unexpected target {t:?}"),
        }
    }

    #[test]
    fn test_push_options() {
        let parsed = Opts::try_parse_from(vec![
            "pt",
            "-k",
            "key",
            "--content-available",
            "--mutable-content",
            "--time-to-live",
            "100",
            "--body",
            "test body",
            "--badge",
            "1",
            "topic",
            "/topics/foobar",
        ])
        .unwrap();
        let options = parsed.push_options().unwrap();
        assert_eq!(Some(true), options.content_available);
        assert_eq!(Some(true), options.mutable_content);
        assert_eq!(Some(100), options.time_to_live);

        let n = options.notification.unwrap();
        assert_eq!(Some("test body".to_string()), n.body);
        assert_eq!(Some(1), n.badge);
        assert!(n.title.is_none());
        assert!(n.localization_args.is_none());
    }

    #[test]
    fn test_explicit_false_flags() {
        let parsed = Opts::try_parse_from(vec![
            "pt",
            "-k",
            "key",
            "--content-available=false",
            "--mutable-content",
            "topic",
            "foobar",
        ])
        .unwrap();
        let options = parsed.push_options().unwrap();
        assert_eq!(Some(false), options.content_available);
        assert_eq!(Some(true), options.mutable_content);
        assert!(options.notification.is_none());
    }

    #[test]
    fn test_localization_args() {
        let parsed = Opts::try_parse_from(vec![
            "pt",
            "-k",
            "key",
            "--loc-key",
            "GAME_PLAY_REQUEST_FORMAT",
            "--loc-args",
            "Jenna",
            "--loc-args",
            "Frank",
            "topic",
            "foobar",
        ])
        .unwrap();
        let n = parsed.push_options().and_then(|o| o.notification).unwrap();
        assert_eq!(Some("GAME_PLAY_REQUEST_FORMAT".to_string()), n.localization_key);
        assert_eq!(
            Some(vec!["Jenna".to_string(), "Frank".to_string()]),
            n.localization_args
        );
        assert!(n.title_localization_args.is_none());
    }

    #[test]
    fn test_negative_badge() {
        let parsed = Opts::try_parse_from(vec![
            "pt",
            "-k",
            "key",
            "--badge",
            "-1",
            "topic",
            "foobar",
        ])
        .unwrap();
        assert_eq!(Some(-1), parsed.badge);
    }

    #[test]
    fn test_parse_data() {
        assert!(parse_data(r#"{"foo":"bar"}"#).is_ok());
        assert!(parse_data("foo").is_err());
    }
}
