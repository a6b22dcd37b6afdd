//! Turns decoded response lines into typed values.
//!
//! A response looks like `%1POWR=1`. Every parser first goes through
//! [`response_value`], so an `ERRx` answer always comes back as
//! [`Error::CommandRejected`] before any field is looked at.

use std::convert::TryFrom;

use crate::command::{Mnemonic, PREFIX};
use crate::error::{Error, RejectCode, Result};
use crate::types::{ErrorStatus, InputSource, LampInfo, MuteState, PowerState, Severity};

/// What a device sends instead of a response when the auth prefix is wrong.
pub const AUTH_ERROR: &str = "PJLINK ERRA";

const ACK: &str = "OK";

/// Checks the frame shape and returns the value after `=`.
pub fn response_value(mnemonic: Mnemonic, line: &str) -> Result<&str> {
    if let Some(code) = rejection(line) {
        return Err(Error::CommandRejected(code));
    }

    let rest = line
        .strip_prefix(PREFIX)
        .ok_or_else(|| Error::Protocol(format!("unexpected frame {:?}", line)))?;
    let (head, value) = rest
        .split_once('=')
        .ok_or_else(|| Error::Protocol(format!("unexpected frame {:?}", line)))?;

    if !head.eq_ignore_ascii_case(mnemonic.as_str()) {
        return Err(Error::Protocol(format!(
            "expected a {} response, got {:?}",
            mnemonic, line
        )));
    }

    Ok(value)
}

/// The rejection carried by `line`, if any.
pub fn rejection(line: &str) -> Option<RejectCode> {
    if line.trim_end().eq_ignore_ascii_case(AUTH_ERROR) {
        return Some(RejectCode::AuthenticationFailure);
    }

    let (_, value) = line.split_once('=')?;
    let value = value.trim_end();
    let marker = value.strip_prefix("ERR")?;
    let mut chars = marker.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => RejectCode::from_marker(c),
        _ => None,
    }
}

pub fn is_auth_failure(line: &str) -> bool {
    rejection(line) == Some(RejectCode::AuthenticationFailure)
}

/// Reply to a set command: `OK` or a rejection.
pub fn acknowledgement(mnemonic: Mnemonic, line: &str) -> Result<()> {
    let value = response_value(mnemonic, line)?;
    if value.trim().eq_ignore_ascii_case(ACK) {
        Ok(())
    } else {
        Err(Error::MalformedResponse(format!(
            "expected {} acknowledgement, got {:?}",
            mnemonic, value
        )))
    }
}

/// The trailing token of a status query as an integer.
pub fn status(mnemonic: Mnemonic, line: &str) -> Result<i64> {
    let value = response_value(mnemonic, line)?.trim();
    value.parse().map_err(|_| {
        Error::MalformedResponse(format!("{} status {:?} is not a number", mnemonic, value))
    })
}

/// Any value that isn't a known power code, numeric or not, is
/// [`PowerState::Unknown`]. Rejections still come back as errors.
pub fn power_state(line: &str) -> Result<PowerState> {
    match status(Mnemonic::Power, line) {
        Ok(code) => Ok(PowerState::from_code(code)),
        Err(Error::MalformedResponse(reason)) => {
            tracing::debug!(%reason, "unreadable power state");
            Ok(PowerState::Unknown)
        }
        Err(e) => Err(e),
    }
}

pub fn input_source(line: &str) -> Result<InputSource> {
    let code = status(Mnemonic::Input, line)?;
    u8::try_from(code)
        .ok()
        .and_then(InputSource::from_code)
        .ok_or_else(|| Error::MalformedResponse(format!("unknown input {}", code)))
}

pub fn mute_state(line: &str) -> Result<MuteState> {
    let code = status(Mnemonic::AvMute, line)?;
    u8::try_from(code)
        .ok()
        .and_then(MuteState::from_code)
        .ok_or_else(|| Error::MalformedResponse(format!("unknown mute state {}", code)))
}

/// Six digits, one per fault category: fan, lamp, temperature, cover, filter, other.
pub fn error_status(line: &str) -> Result<ErrorStatus> {
    let value = response_value(Mnemonic::ErrorStatus, line)?.trim();
    let bytes = value.as_bytes();
    if bytes.len() != 6 || !bytes.iter().all(u8::is_ascii_digit) {
        return Err(Error::MalformedResponse(format!(
            "error status {:?} is not six digits",
            value
        )));
    }

    let field = |i: usize| Severity::from_digit(bytes[i] - b'0');
    Ok(ErrorStatus {
        fan: field(0),
        lamp: field(1),
        temperature: field(2),
        cover_open: field(3),
        filter: field(4),
        other: field(5),
    })
}

/// `hours on/off` pairs, one per lamp.
pub fn lamps(line: &str) -> Result<Vec<LampInfo>> {
    let value = response_value(Mnemonic::Lamp, line)?;
    let tokens: Vec<&str> = value.split_whitespace().collect();
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return Err(Error::MalformedResponse(format!(
            "lamp info {:?} is not hour/state pairs",
            value
        )));
    }

    tokens
        .chunks(2)
        .map(|pair| {
            let hours = pair[0].parse().map_err(|_| {
                Error::MalformedResponse(format!("lamp hours {:?} is not a number", pair[0]))
            })?;
            let is_on = match pair[1] {
                "0" => false,
                "1" => true,
                other => {
                    return Err(Error::MalformedResponse(format!(
                        "lamp state {:?} is not 0 or 1",
                        other
                    )))
                }
            };
            Ok(LampInfo { hours, is_on })
        })
        .collect()
}

/// Free text such as the projector name. Empty is fine.
pub fn text(mnemonic: Mnemonic, line: &str) -> Result<String> {
    Ok(response_value(mnemonic, line)?.trim().to_string())
}

/// Space separated input codes. Tokens that aren't a known input are
/// skipped, so a garbled list only gets shorter.
pub fn input_list(line: &str) -> Result<Vec<InputSource>> {
    let value = response_value(Mnemonic::InputList, line)?;
    Ok(value
        .split_whitespace()
        .filter_map(|token| {
            let source = token.parse().ok().and_then(InputSource::from_code);
            if source.is_none() {
                tracing::debug!(token, "skipping unrecognised input");
            }
            source
        })
        .collect())
}

pub fn class(line: &str) -> Result<u8> {
    let value = response_value(Mnemonic::Class, line)?.trim();
    value.parse().map_err(|_| {
        Error::MalformedResponse(format!("class {:?} is not a number", value))
    })
}
