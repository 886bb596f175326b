//! Provider registry: key format validation, provider detection and
//! display masking.
//!
//! Detection walks `KNOWN_PROVIDERS` in order and stops at the first
//! rule that matches, so a longer prefix (`sk-ant-`) must appear before
//! any shorter prefix it extends (`sk-`).  The last entry is the generic
//! fallback, which makes detection total.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, VaultError};

/// Secrets shorter than this are always rejected.
pub const MIN_SECRET_LEN: usize = 10;

/// Provider id returned when no specific rule matches.
pub const GENERIC_PROVIDER: &str = "custom";

/// Maximum length of a provider id.
const MAX_PROVIDER_ID_LEN: usize = 64;

/// Visible characters kept at each end by `mask_key`.
const MASK_VISIBLE: usize = 4;

/// Upper bound on the number of mask characters in the middle.
const MASK_MAX_MIDDLE: usize = 16;

/// Placeholder for secrets too short to show any characters of.
const MASK_SHORT: &str = "********";

/// How a provider is recognized from the key itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectRule {
    /// The key starts with this literal prefix.
    Prefix(&'static str),
    /// The key is exactly this many ASCII alphanumerics.
    AlphanumericLen(usize),
    /// Matches anything.
    Fallback,
}

impl DetectRule {
    fn matches(&self, secret: &str) -> bool {
        match *self {
            Self::Prefix(prefix) => secret.starts_with(prefix),
            Self::AlphanumericLen(len) => {
                secret.len() == len && secret.bytes().all(|b| b.is_ascii_alphanumeric())
            }
            Self::Fallback => true,
        }
    }
}

/// A provider the vault knows how to recognize.
#[derive(Debug, Clone, Copy)]
pub struct ProviderInfo {
    /// Stable id used as the vault map key (e.g. "openai").
    pub id: &'static str,
    /// Human-readable name for listings.
    pub name: &'static str,
    pub detect: DetectRule,
    /// Shape a well-formed key for this provider usually has.
    pub pattern: &'static str,
}

/// Known providers, in detection order.
pub const KNOWN_PROVIDERS: &[ProviderInfo] = &[
    ProviderInfo {
        id: "anthropic",
        name: "Anthropic",
        detect: DetectRule::Prefix("sk-ant-"),
        pattern: r"^sk-ant-[A-Za-z0-9_\-]{20,}$",
    },
    ProviderInfo {
        id: "openrouter",
        name: "OpenRouter",
        detect: DetectRule::Prefix("sk-or-"),
        pattern: r"^sk-or-[A-Za-z0-9_\-]{20,}$",
    },
    ProviderInfo {
        id: "openai",
        name: "OpenAI",
        detect: DetectRule::Prefix("sk-"),
        pattern: r"^sk-[A-Za-z0-9_\-]{16,}$",
    },
    ProviderInfo {
        id: "google",
        name: "Google AI",
        detect: DetectRule::Prefix("AIza"),
        pattern: r"^AIza[0-9A-Za-z_\-]{35}$",
    },
    ProviderInfo {
        id: "groq",
        name: "Groq",
        detect: DetectRule::Prefix("gsk_"),
        pattern: r"^gsk_[A-Za-z0-9]{20,}$",
    },
    ProviderInfo {
        id: "huggingface",
        name: "Hugging Face",
        detect: DetectRule::Prefix("hf_"),
        pattern: r"^hf_[A-Za-z0-9]{20,}$",
    },
    ProviderInfo {
        id: "mistral",
        name: "Mistral",
        detect: DetectRule::AlphanumericLen(32),
        pattern: r"^[A-Za-z0-9]{32}$",
    },
    ProviderInfo {
        id: GENERIC_PROVIDER,
        name: "Custom",
        detect: DetectRule::Fallback,
        pattern: r"^[\s\S]{10,}$",
    },
];

/// Compiled `pattern` of each known provider, keyed by provider id.
static KEY_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    KNOWN_PROVIDERS
        .iter()
        .filter_map(|p| Regex::new(p.pattern).ok().map(|re| (p.id, re)))
        .collect()
});

/// Look up a known provider by id.
pub fn find(id: &str) -> Option<&'static ProviderInfo> {
    KNOWN_PROVIDERS.iter().find(|p| p.id == id)
}

/// Returns `true` if `id` names one of the built-in providers.
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

/// Ids of all built-in providers, in detection order.
pub fn known_ids() -> Vec<String> {
    KNOWN_PROVIDERS.iter().map(|p| p.id.to_string()).collect()
}

/// Check that a secret is long enough and has a recognizable shape.
///
/// The generic pattern accepts any 10+ character string, so in practice
/// only the length check can reject.  The per-provider patterns are kept
/// for `matches_pattern`.
pub fn validate_format(secret: &str) -> Result<()> {
    let len = secret.chars().count();
    if len < MIN_SECRET_LEN {
        return Err(VaultError::InvalidFormat(format!(
            "key must be at least {MIN_SECRET_LEN} characters (got {len})"
        )));
    }

    if KEY_PATTERNS.iter().any(|(_, re)| re.is_match(secret)) {
        Ok(())
    } else {
        Err(VaultError::InvalidFormat(
            "key does not match any known format".into(),
        ))
    }
}

/// Returns `true` if `secret` fits the stricter pattern of `provider_id`.
pub fn matches_pattern(provider_id: &str, secret: &str) -> bool {
    KEY_PATTERNS
        .iter()
        .find(|(id, _)| *id == provider_id)
        .is_some_and(|(_, re)| re.is_match(secret))
}

/// Guess which provider issued `secret`.  Always returns an id.
pub fn detect_provider(secret: &str) -> &'static str {
    KNOWN_PROVIDERS
        .iter()
        .find(|p| p.detect.matches(secret))
        .map_or(GENERIC_PROVIDER, |p| p.id)
}

/// Render a secret for display without revealing its middle.
///
/// Keys of 8 characters or fewer become a fixed placeholder.  Longer keys
/// keep 4 characters at each end with at most 16 mask characters between.
/// The result never equals the input.
pub fn mask_key(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 2 * MASK_VISIBLE {
        return placeholder_for(secret);
    }

    let hidden = (chars.len() - 2 * MASK_VISIBLE).min(MASK_MAX_MIDDLE);
    let prefix: String = chars[..MASK_VISIBLE].iter().collect();
    let suffix: String = chars[chars.len() - MASK_VISIBLE..].iter().collect();
    let masked = format!("{prefix}{}{suffix}", "*".repeat(hidden));

    // A key whose middle is already all '*' would mask to itself.
    if masked == secret {
        placeholder_for(secret)
    } else {
        masked
    }
}

/// Fixed placeholder, one character longer if the secret is the
/// placeholder itself.
fn placeholder_for(secret: &str) -> String {
    if secret == MASK_SHORT {
        format!("{MASK_SHORT}*")
    } else {
        MASK_SHORT.to_string()
    }
}

/// Validate that a provider id is safe to use as a map key.
///
/// Allowed: ASCII letters, digits, underscores, hyphens, periods.
/// Must be non-empty and at most 64 characters.
pub fn validate_provider_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(VaultError::InvalidFormat(
            "provider id cannot be empty".into(),
        ));
    }
    if id.len() > MAX_PROVIDER_ID_LEN {
        return Err(VaultError::InvalidFormat(format!(
            "provider id cannot exceed {MAX_PROVIDER_ID_LEN} characters"
        )));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-' || b == b'.')
    {
        return Err(VaultError::InvalidFormat(format!(
            "provider id '{id}' contains invalid characters — only ASCII letters, digits, underscores, hyphens, and periods are allowed"
        )));
    }
    Ok(())
}
