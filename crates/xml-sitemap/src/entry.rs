//! A single validated URL record and its image/video annotations.

use crate::clock::Clock;
use crate::error::{Result, SitemapError};
use crate::time::{TimeInput, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Priority used when the caller does not give one.
pub const DEFAULT_PRIORITY: f64 = 0.5;

/// How often the page at a URL is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    None,
    Always,
    Hourly,
    Daily,
    #[default]
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    pub const ALL: [ChangeFrequency; 8] = [
        ChangeFrequency::None,
        ChangeFrequency::Always,
        ChangeFrequency::Hourly,
        ChangeFrequency::Daily,
        ChangeFrequency::Weekly,
        ChangeFrequency::Monthly,
        ChangeFrequency::Yearly,
        ChangeFrequency::Never,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::None => "none",
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeFrequency {
    type Err = SitemapError;

    /// Case-insensitive; surrounding whitespace and a leading `:` are ignored.
    fn from_str(s: &str) -> Result<Self> {
        let token = s.trim();
        let token = token.strip_prefix(':').unwrap_or(token).to_lowercase();
        Self::ALL
            .into_iter()
            .find(|period| period.as_str() == token)
            .ok_or_else(|| SitemapError::InvalidPeriod(s.to_string()))
    }
}

/// Image annotation input. Ignored unless `location` is non-empty.
///
/// Empty strings count as unset everywhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// URL of the image. Required for the block to be kept.
    pub location: Option<String>,
    /// Caption text.
    pub caption: Option<String>,
    /// Image title.
    pub title: Option<String>,
    /// URL of the image license.
    pub license: Option<String>,
    /// Free-form place name, e.g. "Limerick, Ireland".
    pub geo_location: Option<String>,
}

/// A validated `image:image` block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    /// URL of the image. Never empty.
    pub location: String,
    /// Caption text.
    pub caption: Option<String>,
    /// Image title.
    pub title: Option<String>,
    /// URL of the image license.
    pub license: Option<String>,
    /// Free-form place name.
    pub geo_location: Option<String>,
}

impl ImageOptions {
    fn into_image(self) -> Option<Image> {
        Some(Image {
            location: non_empty(self.location)?,
            caption: non_empty(self.caption),
            title: non_empty(self.title),
            license: non_empty(self.license),
            geo_location: non_empty(self.geo_location),
        })
    }
}

/// Video annotation input.
///
/// Dates get the same validation as `updated`. The block is only rendered when
/// thumbnail, title, description and a content or player location are all set.
/// Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoOptions {
    /// URL of the thumbnail image. Required.
    pub thumbnail_location: Option<String>,
    /// Video title. Required.
    pub title: Option<String>,
    /// Video description. Required.
    pub description: Option<String>,
    /// URL of the media file. This or `player_location` is required.
    pub content_location: Option<String>,
    /// URL of an embeddable player.
    pub player_location: Option<String>,
    /// Seconds.
    pub duration: Option<u32>,
    /// When the video stops being available.
    pub expiration_date: Option<TimeInput>,
    /// 0.0 to 5.0.
    pub rating: Option<f64>,
    /// Number of times viewed.
    pub view_count: Option<u64>,
    /// When the video was first published.
    pub publication_date: Option<TimeInput>,
    /// Rendered as `yes`/`no`.
    pub family_friendly: Option<bool>,
    /// Short category label.
    pub category: Option<String>,
    /// Space-separated country codes where playback is allowed.
    pub restriction: Option<String>,
    /// URL of a gallery page the video belongs to.
    pub gallery_location: Option<String>,
    /// Always rendered as USD.
    pub price: Option<f64>,
    /// Rendered as `yes`/`no`.
    pub requires_subscription: Option<bool>,
    /// Name of the uploader.
    pub uploader: Option<String>,
    /// Space-separated platforms where playback is allowed.
    pub platform: Option<String>,
    /// Rendered as `yes`/`no`.
    pub live: Option<bool>,
}

/// Validated video metadata attached to an entry.
///
/// Field meanings follow [`VideoOptions`]; dates are parsed timestamps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    /// URL of the thumbnail image.
    pub thumbnail_location: Option<String>,
    /// Video title.
    pub title: Option<String>,
    /// Video description.
    pub description: Option<String>,
    /// URL of the media file.
    pub content_location: Option<String>,
    /// URL of an embeddable player.
    pub player_location: Option<String>,
    /// Seconds.
    pub duration: Option<u32>,
    /// When the video stops being available.
    pub expiration_date: Option<Timestamp>,
    /// 0.0 to 5.0.
    pub rating: Option<f64>,
    /// Number of times viewed.
    pub view_count: Option<u64>,
    /// When the video was first published.
    pub publication_date: Option<Timestamp>,
    /// Family-friendly flag.
    pub family_friendly: Option<bool>,
    /// Short category label.
    pub category: Option<String>,
    /// Allowed country codes.
    pub restriction: Option<String>,
    /// URL of a gallery page.
    pub gallery_location: Option<String>,
    /// Price in USD.
    pub price: Option<f64>,
    /// Subscription flag.
    pub requires_subscription: Option<bool>,
    /// Name of the uploader.
    pub uploader: Option<String>,
    /// Allowed platforms.
    pub platform: Option<String>,
    /// Live-stream flag.
    pub live: Option<bool>,
}

impl Video {
    /// Whether the required fields for a `video:video` block are present.
    pub fn is_renderable(&self) -> bool {
        is_set(&self.thumbnail_location)
            && is_set(&self.title)
            && is_set(&self.description)
            && (is_set(&self.content_location) || is_set(&self.player_location))
    }
}

impl VideoOptions {
    fn validate(self, validate_time: bool) -> Result<Video> {
        let expiration_date = self
            .expiration_date
            .map(|d| Timestamp::parse(d, validate_time, "video expiration_date"))
            .transpose()?;
        let publication_date = self
            .publication_date
            .map(|d| Timestamp::parse(d, validate_time, "video publication_date"))
            .transpose()?;

        Ok(Video {
            thumbnail_location: non_empty(self.thumbnail_location),
            title: non_empty(self.title),
            description: non_empty(self.description),
            content_location: non_empty(self.content_location),
            player_location: non_empty(self.player_location),
            duration: self.duration,
            expiration_date,
            rating: self.rating,
            view_count: self.view_count,
            publication_date,
            family_friendly: self.family_friendly,
            category: non_empty(self.category),
            restriction: non_empty(self.restriction),
            gallery_location: non_empty(self.gallery_location),
            price: self.price,
            requires_subscription: self.requires_subscription,
            uploader: non_empty(self.uploader),
            platform: non_empty(self.platform),
            live: self.live,
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn is_set(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// Per-entry options. Every field is optional; see each for its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryOptions {
    /// Defaults to the owning map's creation time.
    pub updated: Option<TimeInput>,
    /// Defaults to 0.5.
    pub priority: Option<f64>,
    /// Change frequency token, defaults to `weekly`.
    pub period: Option<String>,
    /// Check string timestamps against ISO 8601. Defaults to true.
    pub validate_time: bool,
    /// Optional `image:image` block.
    pub image: Option<ImageOptions>,
    /// Optional `video:video` block.
    pub video: Option<VideoOptions>,
}

impl Default for EntryOptions {
    fn default() -> Self {
        Self {
            updated: None,
            priority: None,
            period: None,
            validate_time: true,
            image: None,
            video: None,
        }
    }
}

impl EntryOptions {
    pub fn updated(mut self, updated: impl Into<TimeInput>) -> Self {
        self.updated = Some(updated.into());
        self
    }

    pub fn priority(mut self, priority: f64) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Accepts a [`ChangeFrequency`] or any string token.
    pub fn period(mut self, period: impl ToString) -> Self {
        self.period = Some(period.to_string());
        self
    }

    pub fn validate_time(mut self, validate: bool) -> Self {
        self.validate_time = validate;
        self
    }

    pub fn image(mut self, image: ImageOptions) -> Self {
        self.image = Some(image);
        self
    }

    pub fn video(mut self, video: VideoOptions) -> Self {
        self.video = Some(video);
        self
    }
}

/// One URL record destined for a `url` element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Entry {
    target: String,
    updated: Timestamp,
    priority: f64,
    change_frequency: ChangeFrequency,
    image: Option<Image>,
    video: Option<Video>,
}

impl Entry {
    /// Validate a target and its options. `updated` falls back to `clock`.
    ///
    /// The target is only trimmed here; qualifying it against a domain is the
    /// job of [`crate::Map::add`].
    pub fn new(target: &str, options: EntryOptions, clock: &dyn Clock) -> Result<Self> {
        let fallback = clock.now();
        Self::with_default_time(target, options, fallback.into())
    }

    pub(crate) fn with_default_time(
        target: &str,
        options: EntryOptions,
        fallback: TimeInput,
    ) -> Result<Self> {
        let target = target.trim();
        if target.is_empty() {
            return Err(SitemapError::EmptyTarget);
        }

        let validate_time = options.validate_time;
        let updated = Timestamp::parse(
            options.updated.unwrap_or(fallback),
            validate_time,
            "updated",
        )?;

        let change_frequency = match options.period {
            Some(ref period) => period.parse()?,
            None => ChangeFrequency::default(),
        };

        let video = options
            .video
            .map(|v| v.validate(validate_time))
            .transpose()?;

        Ok(Self {
            target: target.to_string(),
            updated,
            priority: options.priority.unwrap_or(DEFAULT_PRIORITY),
            change_frequency,
            image: options.image.and_then(ImageOptions::into_image),
            video,
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn updated(&self) -> &Timestamp {
        &self.updated
    }

    pub fn priority(&self) -> f64 {
        self.priority
    }

    pub fn change_frequency(&self) -> ChangeFrequency {
        self.change_frequency
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn video(&self) -> Option<&Video> {
        self.video.as_ref()
    }

    /// The video block, only when it has everything needed to render.
    pub fn renderable_video(&self) -> Option<&Video> {
        self.video.as_ref().filter(|v| v.is_renderable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2011, 6, 1, 0, 0, 1).unwrap())
    }

    #[test]
    fn test_defaults() {
        let entry = Entry::new(" http://foobar.com/ ", EntryOptions::default(), &clock()).unwrap();
        assert_eq!(entry.target(), "http://foobar.com/");
        assert_eq!(entry.priority(), 0.5);
        assert_eq!(entry.change_frequency(), ChangeFrequency::Weekly);
        assert_eq!(entry.updated().to_string(), "2011-06-01T00:00:01Z");
        assert!(entry.image().is_none());
        assert!(entry.video().is_none());
    }

    #[test]
    fn test_empty_target() {
        let err = Entry::new("   ", EntryOptions::default(), &clock()).unwrap_err();
        assert!(matches!(err, SitemapError::EmptyTarget));
    }

    #[test]
    fn test_invalid_period() {
        let err = Entry::new("hello", EntryOptions::default().period("foobar"), &clock())
            .unwrap_err();
        assert!(matches!(err, SitemapError::InvalidPeriod(ref p) if p == "foobar"));
        assert_eq!(err.to_string(), "invalid period value 'foobar'");
    }

    #[test]
    fn test_period_normalization() {
        assert_eq!("Daily".parse::<ChangeFrequency>().unwrap(), ChangeFrequency::Daily);
        assert_eq!(":never".parse::<ChangeFrequency>().unwrap(), ChangeFrequency::Never);
        assert_eq!(" none ".parse::<ChangeFrequency>().unwrap(), ChangeFrequency::None);
        let entry = Entry::new(
            "x",
            EntryOptions::default().period(ChangeFrequency::Monthly),
            &clock(),
        )
        .unwrap();
        assert_eq!(entry.change_frequency(), ChangeFrequency::Monthly);
    }

    #[test]
    fn test_image_requires_location() {
        let options = EntryOptions::default().image(ImageOptions {
            caption: Some("no location".into()),
            ..Default::default()
        });
        let entry = Entry::new("x", options, &clock()).unwrap();
        assert!(entry.image().is_none());
    }

    #[test]
    fn test_video_dates_validated_independently() {
        let options = EntryOptions::default().video(VideoOptions {
            expiration_date: Some("2012-01-01".into()),
            publication_date: Some("not a date".into()),
            ..Default::default()
        });
        let err = Entry::new("x", options, &clock()).unwrap_err();
        assert!(matches!(
            err,
            SitemapError::InvalidTimeFormat { field: "video publication_date", .. }
        ));

        let options = EntryOptions::default().video(VideoOptions {
            expiration_date: Some("soon".into()),
            ..Default::default()
        });
        let err = Entry::new("x", options, &clock()).unwrap_err();
        assert!(matches!(
            err,
            SitemapError::InvalidTimeFormat { field: "video expiration_date", .. }
        ));
    }

    #[test]
    fn test_video_renderable_precondition() {
        let mut video = VideoOptions {
            thumbnail_location: Some("http://foobar.com/t.jpg".into()),
            title: Some("Title".into()),
            description: Some("Description".into()),
            ..Default::default()
        };
        let entry = Entry::new("x", EntryOptions::default().video(video.clone()), &clock()).unwrap();
        assert!(entry.video().is_some());
        assert!(entry.renderable_video().is_none());

        video.player_location = Some("http://foobar.com/player".into());
        let entry = Entry::new("x", EntryOptions::default().video(video), &clock()).unwrap();
        assert!(entry.renderable_video().is_some());
    }

    #[test]
    fn test_empty_strings_are_unset() {
        let options = EntryOptions::default()
            .image(ImageOptions {
                location: Some("http://foobar.com/i.jpg".into()),
                caption: Some(String::new()),
                title: Some("Beach".into()),
                ..Default::default()
            })
            .video(VideoOptions {
                thumbnail_location: Some(String::new()),
                title: Some(String::new()),
                description: Some(String::new()),
                player_location: Some(String::new()),
                uploader: Some(String::new()),
                ..Default::default()
            });
        let entry = Entry::new("x", options, &clock()).unwrap();

        let image = entry.image().unwrap();
        assert_eq!(image.caption, None);
        assert_eq!(image.title.as_deref(), Some("Beach"));

        let video = entry.video().unwrap();
        assert_eq!(video.title, None);
        assert_eq!(video.uploader, None);
        assert!(entry.renderable_video().is_none());

        let empty_image = EntryOptions::default().image(ImageOptions {
            location: Some(String::new()),
            ..Default::default()
        });
        assert!(Entry::new("x", empty_image, &clock()).unwrap().image().is_none());
    }

    #[test]
    fn test_options_from_json() {
        let options: EntryOptions =
            serde_json::from_str(r#"{"priority": 0.8, "period": "daily"}"#).unwrap();
        assert!(options.validate_time);
        let entry = Entry::new("x", options, &clock()).unwrap();
        assert_eq!(entry.priority(), 0.8);
        assert_eq!(entry.change_frequency(), ChangeFrequency::Daily);
    }
}
