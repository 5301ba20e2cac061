//! Serial wire format.
//!
//! The sensor emits one ASCII frame per line, every ~2 s:
//!
//! ```text
//! PH:6.45,R:230,G:220,B:160,C:512
//! ```
//!
//! Field order is fixed. `C` is the raw clear-channel count from the color
//! sensor; it is carried through parsing but not used for scoring.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum WireError {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("invalid value for `{field}`: {value}")]
    InvalidValue { field: &'static str, value: String },
    #[error("ph {0} out of range 0-14")]
    PhOutOfRange(f32),
    #[error("unexpected field `{0}`")]
    UnexpectedField(String),
}

/// One parsed sensor frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorFrame {
    pub ph: f32,
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub clear: u32,
}

/// Parse one `PH:..,R:..,G:..,B:..,C:..` line. Trailing CR/whitespace is
/// tolerated; anything else is an error, never a guess.
pub fn parse_line(line: &str) -> Result<SensorFrame, WireError> {
    const FIELDS: [&str; 5] = ["PH", "R", "G", "B", "C"];

    let mut values = [""; 5];
    let mut parts = line.trim().split(',');

    for (i, name) in FIELDS.iter().enumerate() {
        let part = parts.next().ok_or(WireError::MissingField(name))?;
        let (key, value) = part
            .split_once(':')
            .ok_or(WireError::MissingField(name))?;
        if key.trim() != *name {
            return Err(WireError::UnexpectedField(key.trim().to_string()));
        }
        values[i] = value.trim();
    }
    if let Some(extra) = parts.next() {
        return Err(WireError::UnexpectedField(extra.trim().to_string()));
    }

    let ph: f32 = values[0].parse().map_err(|_| WireError::InvalidValue {
        field: "PH",
        value: values[0].to_string(),
    })?;
    if !(0.0..=14.0).contains(&ph) {
        return Err(WireError::PhOutOfRange(ph));
    }

    let channel = |i: usize, field: &'static str| -> Result<u8, WireError> {
        values[i].parse().map_err(|_| WireError::InvalidValue {
            field,
            value: values[i].to_string(),
        })
    };

    Ok(SensorFrame {
        ph,
        r: channel(1, "R")?,
        g: channel(2, "G")?,
        b: channel(3, "B")?,
        clear: values[4].parse().map_err(|_| WireError::InvalidValue {
            field: "C",
            value: values[4].to_string(),
        })?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wellformed_frame() {
        let frame = parse_line("PH:6.45,R:230,G:220,B:160,C:512").unwrap();
        assert_eq!(
            frame,
            SensorFrame {
                ph: 6.45,
                r: 230,
                g: 220,
                b: 160,
                clear: 512
            }
        );
    }

    #[test]
    fn tolerates_crlf_and_spaces() {
        let frame = parse_line("  PH: 7.0, R: 200, G: 190, B: 120, C: 44\r\n").unwrap();
        assert_eq!(frame.ph, 7.0);
        assert_eq!(frame.clear, 44);
    }

    #[test]
    fn rejects_missing_field() {
        assert_eq!(
            parse_line("PH:6.5,R:200,G:190,B:120"),
            Err(WireError::MissingField("C"))
        );
    }

    #[test]
    fn rejects_wrong_field_order() {
        let err = parse_line("R:200,PH:6.5,G:190,B:120,C:1").unwrap_err();
        assert_eq!(err, WireError::UnexpectedField("R".into()));
    }

    #[test]
    fn rejects_bad_number() {
        let err = parse_line("PH:6.5,R:abc,G:190,B:120,C:1").unwrap_err();
        assert_eq!(
            err,
            WireError::InvalidValue {
                field: "R",
                value: "abc".into()
            }
        );
    }

    #[test]
    fn rejects_channel_over_255() {
        let err = parse_line("PH:6.5,R:300,G:190,B:120,C:1").unwrap_err();
        assert!(matches!(err, WireError::InvalidValue { field: "R", .. }));
    }

    #[test]
    fn rejects_ph_out_of_range() {
        assert_eq!(
            parse_line("PH:15.2,R:200,G:190,B:120,C:1"),
            Err(WireError::PhOutOfRange(15.2))
        );
    }

    #[test]
    fn rejects_trailing_garbage() {
        let err = parse_line("PH:6.5,R:200,G:190,B:120,C:1,X:9").unwrap_err();
        assert_eq!(err, WireError::UnexpectedField("X:9".into()));
    }
}
