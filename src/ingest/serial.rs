//! Hardware ingestion path.
//!
//! Opens the configured serial device once and consumes its line-delimited
//! frame stream for the life of the process. Bad frames and failed inserts
//! are logged and skipped; a dead link ends the task with an error log and
//! no reconnection, the rest of the service keeps serving.

use time::OffsetDateTime;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::ingest::wire;
use crate::readings::repo::{self, NewReading, Source};
use crate::state::AppState;

/// Read frames from the serial link and persist one reading per frame,
/// attributed to the account configured on the link.
pub async fn run(state: AppState) {
    let Some(serial) = state.config.serial.clone() else {
        return;
    };
    let user_id = serial.user_id;

    let file = match File::open(&serial.port).await {
        Ok(f) => f,
        Err(e) => {
            error!(port = %serial.port, error = %e, "failed to open serial port");
            return;
        }
    };
    info!(port = %serial.port, device_id = %serial.device_id, "serial ingest started");

    let mut lines = BufReader::new(file).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                let frame = match wire::parse_line(&line) {
                    Ok(f) => f,
                    Err(e) => {
                        warn!(error = %e, line = %line.trim(), "skipping malformed frame");
                        continue;
                    }
                };
                let new = NewReading::classified(
                    user_id,
                    frame.ph,
                    (frame.r, frame.g, frame.b),
                    OffsetDateTime::now_utc(),
                    Some(serial.device_id.clone()),
                    Source::Sensor,
                );
                if let Err(e) = repo::insert(&state.db, &new).await {
                    warn!(error = %e, "failed to persist sensor reading");
                }
            }
            Ok(None) => {
                error!(port = %serial.port, "serial stream ended");
                return;
            }
            Err(e) => {
                error!(port = %serial.port, error = %e, "serial read failed");
                return;
            }
        }
    }
}
