//! Bare `@token` identifiers used by path masks.

use std::borrow::Cow;

use crate::config::TemplateConfig;
use crate::message::Message;
use crate::template::time::PassTime;
use crate::utils::{OutputError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Epoch,
    Date,
    Year,
    Month,
    Day,
    DateTime,
    Time,
    Hour,
    Minute,
    Second,
    Topic,
    /// `topic1`..`topic9`, 1-indexed into the subscribed topics.
    SubscribedTopic(usize),
    Id,
    /// Anything unrecognized resolves to its own spelling.
    Literal(&'a str),
}

impl<'a> Token<'a> {
    pub fn parse(name: &'a str) -> Self {
        match name {
            "epoch" => Token::Epoch,
            "date" => Token::Date,
            "year" => Token::Year,
            "month" => Token::Month,
            "day" => Token::Day,
            "datetime" => Token::DateTime,
            "time" => Token::Time,
            "hour" => Token::Hour,
            "min" => Token::Minute,
            "sec" => Token::Second,
            "topic" => Token::Topic,
            "id" => Token::Id,
            _ => match name.strip_prefix("topic").map(str::as_bytes) {
                Some(&[digit @ b'1'..=b'9']) => Token::SubscribedTopic(usize::from(digit - b'0')),
                _ => Token::Literal(name),
            },
        }
    }
}

/// Resolves a single mask token to its current value.
///
/// Time-based tokens read the pass clock; the first one captures it.
pub fn resolve<'a>(
    token: &'a str,
    msg: &Message<'a>,
    cfg: &'a TemplateConfig,
    time: &mut PassTime<'_>,
) -> Result<Cow<'a, str>> {
    let value = match Token::parse(token) {
        Token::Topic => Cow::Borrowed(msg.topic),
        Token::Id => Cow::Borrowed(cfg.client_id.as_str()),
        Token::Literal(text) => Cow::Borrowed(text),
        Token::SubscribedTopic(n) => cfg
            .subscribed_topics
            .get(n - 1)
            .map(|topic| Cow::Borrowed(topic.as_str()))
            .ok_or_else(|| OutputError::TokenNotFound(token.to_string()))?,
        Token::Epoch => Cow::Owned(time.get()?.epoch().to_string()),
        Token::Date => {
            let t = time.get()?;
            Cow::Owned(format!("{:04}{:02}{:02}", t.year(), t.month(), t.day()))
        }
        Token::Year => Cow::Owned(format!("{:04}", time.get()?.year())),
        Token::Month => Cow::Owned(format!("{:02}", time.get()?.month())),
        Token::Day => Cow::Owned(format!("{:02}", time.get()?.day())),
        Token::DateTime => {
            let t = time.get()?;
            Cow::Owned(format!(
                "{:04}{:02}{:02}.{:02}{:02}{:02}",
                t.year(),
                t.month(),
                t.day(),
                t.hour(),
                t.minute(),
                t.second()
            ))
        }
        Token::Time => {
            let t = time.get()?;
            Cow::Owned(format!("{:02}{:02}{:02}", t.hour(), t.minute(), t.second()))
        }
        Token::Hour => Cow::Owned(format!("{:02}", time.get()?.hour())),
        Token::Minute => Cow::Owned(format!("{:02}", time.get()?.minute())),
        Token::Second => Cow::Owned(format!("{:02}", time.get()?.second())),
    };
    Ok(value)
}
