use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::config::Config;
use crate::types::{RequestError, SlackCommand};

type HmacSha256 = Hmac<Sha256>;

const MAX_CLOCK_SKEW_SECS: u64 = 60 * 5;

pub fn verify_slack_signature(
    signing_secret: &str,
    body: &[u8],
    timestamp: &str,
    signature: &str,
) -> Result<(), RequestError> {
    let current_time = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| RequestError::Signature(e.to_string()))?
        .as_secs();
    verify_signature_at(signing_secret, body, timestamp, signature, current_time)
}

fn verify_signature_at(
    signing_secret: &str,
    body: &[u8],
    timestamp: &str,
    signature: &str,
    current_time: u64,
) -> Result<(), RequestError> {
    let request_timestamp: u64 = Some(timestamp)
        .filter(|t| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|t| t.parse().ok())
        .ok_or_else(|| RequestError::Signature(format!("bad timestamp {:?}", timestamp)))?;

    if current_time.abs_diff(request_timestamp) > MAX_CLOCK_SKEW_SECS {
        return Err(RequestError::Signature("stale timestamp".to_string()));
    }

    let expected = signature
        .strip_prefix("v0=")
        .and_then(|hex_sig| hex::decode(hex_sig).ok())
        .ok_or_else(|| RequestError::Signature("malformed signature".to_string()))?;

    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|e| RequestError::Signature(e.to_string()))?;
    mac.update(format!("v0:{}:", timestamp).as_bytes());
    mac.update(body);

    mac.verify_slice(&expected)
        .map_err(|_| RequestError::Signature("signature mismatch".to_string()))
}

/// Decodes the form body, pulling out the three fields this command needs.
pub fn parse_command(body: &[u8]) -> Result<SlackCommand, RequestError> {
    let body = std::str::from_utf8(body).map_err(|e| RequestError::Decode(e.to_string()))?;
    check_escapes(body)?;
    let mut params: HashMap<String, String> =
        serde_urlencoded::from_str(body).map_err(|e| RequestError::Decode(e.to_string()))?;

    let mut field = |name: &str| {
        params
            .remove(name)
            .ok_or_else(|| RequestError::Decode(format!("missing field `{}`", name)))
    };

    Ok(SlackCommand {
        token: field("token")?,
        trigger_word: field("trigger_word")?,
        text: field("text")?,
    })
}

// serde_urlencoded decodes bad escapes lossily; reject them up front.
fn check_escapes(body: &str) -> Result<(), RequestError> {
    let bytes = body.as_bytes();
    for (at, _) in body.match_indices('%') {
        let valid = bytes
            .get(at + 1..at + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(RequestError::Decode(format!("invalid URL escape at byte {}", at)));
        }
    }
    Ok(())
}

/// Checks the shared token and trigger word against the configuration.
pub fn validate_command(config: &Config, command: &SlackCommand) -> Result<(), RequestError> {
    if !config.allowed_tokens.contains(&command.token) || command.trigger_word != config.trigger_word {
        return Err(RequestError::Auth {
            trigger_word: command.trigger_word.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
pub(crate) fn sign(signing_secret: &str, body: &[u8], timestamp: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes()).unwrap();
    mac.update(format!("v0:{}:", timestamp).as_bytes());
    mac.update(body);
    format!("v0={}", hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            allowed_tokens: ["good".to_string(), "also-good".to_string()].into_iter().collect(),
            trigger_word: "flip".to_string(),
            ..Config::default()
        }
    }

    #[test]
    fn parses_slack_form() {
        let body = b"token=good&team_id=T0001&channel_name=general&trigger_word=flip&text=flip+hello%21";
        let command = parse_command(body).unwrap();
        assert_eq!(
            command,
            SlackCommand {
                token: "good".to_string(),
                trigger_word: "flip".to_string(),
                text: "flip hello!".to_string(),
            }
        );
    }

    #[test]
    fn empty_fields_are_present_fields() {
        let command = parse_command(b"token=&trigger_word=&text=").unwrap();
        assert_eq!(command.token, "");
        assert_eq!(command.text, "");
    }

    #[test]
    fn missing_field_is_decode_error() {
        let err = parse_command(b"token=good&text=hello").unwrap_err();
        assert!(matches!(err, RequestError::Decode(ref msg) if msg.contains("trigger_word")));
        assert!(matches!(parse_command(b"garbage"), Err(RequestError::Decode(_))));
    }

    #[test]
    fn non_utf8_body_is_decode_error() {
        assert!(matches!(
            parse_command(&[0x74, 0x6f, 0xff, 0xfe]),
            Err(RequestError::Decode(_))
        ));
    }

    #[test]
    fn invalid_escapes_are_decode_errors() {
        for body in [
            &b"token=good&trigger_word=flip&text=%zz"[..],
            b"token=good&trigger_word=flip&text=100%",
            b"token=good&trigger_word=flip&text=%4",
        ] {
            assert!(matches!(parse_command(body), Err(RequestError::Decode(_))));
        }
        let command = parse_command(b"token=good&trigger_word=flip&text=100%25+%E6%97%A5").unwrap();
        assert_eq!(command.text, "100% 日");
    }

    #[test]
    fn accepts_known_token_and_trigger() {
        let command = SlackCommand {
            token: "also-good".to_string(),
            trigger_word: "flip".to_string(),
            text: "flip it".to_string(),
        };
        assert!(validate_command(&config(), &command).is_ok());
    }

    #[test]
    fn rejects_unknown_token_or_trigger() {
        let bad_token = SlackCommand {
            token: "goo".to_string(),
            trigger_word: "flip".to_string(),
            text: String::new(),
        };
        let bad_trigger = SlackCommand {
            token: "good".to_string(),
            trigger_word: "Flip".to_string(),
            text: String::new(),
        };
        assert!(matches!(validate_command(&config(), &bad_token), Err(RequestError::Auth { .. })));
        assert!(matches!(validate_command(&config(), &bad_trigger), Err(RequestError::Auth { .. })));
    }

    #[test]
    fn verifies_fresh_signature() {
        let body = b"token=good&trigger_word=flip&text=flip";
        let signature = sign("secret", body, "1700000000");
        assert!(verify_signature_at("secret", body, "1700000000", &signature, 1700000100).is_ok());
    }

    #[test]
    fn timestamp_must_be_plain_digits() {
        let body = b"token=good&trigger_word=flip&text=flip";
        let signature = sign("secret", body, "+1700000000");
        assert!(matches!(
            verify_signature_at("secret", body, "+1700000000", &signature, 1700000000),
            Err(RequestError::Signature(ref msg)) if msg.contains("bad timestamp")
        ));
    }

    #[test]
    fn rejects_tampered_or_stale_signature() {
        let body = b"token=good&trigger_word=flip&text=flip";
        let signature = sign("secret", body, "1700000000");
        assert!(verify_signature_at("secret", b"token=evil", "1700000000", &signature, 1700000000).is_err());
        assert!(verify_signature_at("other", body, "1700000000", &signature, 1700000000).is_err());
        assert!(verify_signature_at("secret", body, "1700000000", &signature, 1700000301).is_err());
        assert!(verify_signature_at("secret", body, "soon", &signature, 1700000000).is_err());
        assert!(verify_signature_at("secret", body, "", &signature, 1700000000).is_err());
        assert!(verify_signature_at("secret", body, "1700000000", "deadbeef", 1700000000).is_err());
    }
}
