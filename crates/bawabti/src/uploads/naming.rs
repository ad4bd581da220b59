use chrono::{DateTime, Utc};
use unicode_normalization::UnicodeNormalization;

use super::kind::ArtifactKind;

const RESERVED_DEVICE_NAMES: &[&str] = &[
    "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
    "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
];

/// Source of the upload instant used in generated names.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reduce a client-supplied filename to a safe single path component.
///
/// The name is NFKD-decomposed first, so accented Latin letters keep their base
/// letter. Separators turn into spaces, whitespace runs collapse to `_`, anything
/// outside `[A-Za-z0-9_.-]` is dropped and leading/trailing `.`/`_` are trimmed.
/// Names in non-Latin scripts can come out empty.
pub fn sanitize_filename(raw: &str) -> String {
    let decomposed: String = raw.nfkd().collect();
    let separated = decomposed.replace(['/', '\\'], " ");
    let joined = separated.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    let stem = trimmed.split('.').next().unwrap_or_default();
    if !trimmed.is_empty()
        && RESERVED_DEVICE_NAMES
            .iter()
            .any(|device| device.eq_ignore_ascii_case(stem))
    {
        return format!("_{trimmed}");
    }

    trimmed.to_string()
}

/// `{tag}_{unix seconds}_{sanitized}`. Same kind, second and filename give the same name.
pub fn storage_name(kind: ArtifactKind, sanitized: &str, at: DateTime<Utc>) -> String {
    format!("{}_{}_{}", kind.tag(), at.timestamp(), sanitized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn strips_directories_and_unsafe_characters() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "etc_passwd");
        assert_eq!(sanitize_filename("My CV (final).pdf"), "My_CV_final.pdf");
        assert_eq!(sanitize_filename("C:\\Users\\me\\cv.docx"), "C_Users_me_cv.docx");
        assert_eq!(sanitize_filename("  .hidden.pdf "), "hidden.pdf");
    }

    #[test]
    fn accented_letters_keep_their_base_letter() {
        assert_eq!(sanitize_filename("résumé.pdf"), "resume.pdf");
        assert_eq!(sanitize_filename("Ñandú CV.docx"), "Nandu_CV.docx");
        assert_eq!(sanitize_filename("ﬁle①.pdf"), "file1.pdf");
    }

    #[test]
    fn non_ascii_names_lose_their_stem() {
        assert_eq!(sanitize_filename("سيرة.pdf"), "pdf");
        assert_eq!(sanitize_filename("فيديو"), "");
    }

    #[test]
    fn reserved_device_names_are_prefixed() {
        assert_eq!(sanitize_filename("con.pdf"), "_con.pdf");
        assert_eq!(sanitize_filename("NUL"), "_NUL");
        assert_eq!(sanitize_filename("console.pdf"), "console.pdf");
    }

    #[test]
    fn storage_name_uses_kind_tag_and_unix_seconds() {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant");
        assert_eq!(
            storage_name(ArtifactKind::Resume, "cv.pdf", at),
            format!("cv_{}_cv.pdf", at.timestamp())
        );
        assert_eq!(
            storage_name(ArtifactKind::Video, "intro.mp4", at),
            "video_1709294400_intro.mp4"
        );
    }

    #[test]
    fn names_collide_within_the_same_second() {
        let first = Utc
            .with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant");
        let later_same_second = first + chrono::Duration::milliseconds(900);
        assert_eq!(
            storage_name(ArtifactKind::Resume, "cv.pdf", first),
            storage_name(ArtifactKind::Resume, "cv.pdf", later_same_second)
        );
        assert_ne!(
            storage_name(ArtifactKind::Resume, "cv.pdf", first),
            storage_name(ArtifactKind::Resume, "cv.pdf", first + chrono::Duration::seconds(1))
        );
    }
}
