//! Minimal SNTPv3 client (RFC 4330), client mode only.

use std::time::Duration;

use anyhow::{Context as _, Result, bail};
use chrono::{DateTime, TimeDelta, Utc};
use tokio::{
    net::UdpSocket,
    time::{Instant, timeout},
};
use tracing::debug;

pub const PACKET_LEN: usize = 48;

/// Per-request receive timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Seconds between 1900-01-01 (NTP era 0) and 1970-01-01.
const NTP_UNIX_OFFSET_SECS: i64 = 2_208_988_800;

// LI = 0, VN = 3, Mode = 3 (client)
const CLIENT_REQUEST_HEADER: u8 = 0x1B;

const MODE_SERVER: u8 = 4;
const MODE_BROADCAST: u8 = 5;

/// Stratum 16 means unsynchronized; 0 is a kiss-o'-death.
const MAX_STRATUM: u8 = 15;

pub fn request_packet() -> [u8; PACKET_LEN] {
    let mut packet = [0u8; PACKET_LEN];
    packet[0] = CLIENT_REQUEST_HEADER;
    packet
}

/// Extracts the server's transmit timestamp from a response packet.
pub fn parse_response(packet: &[u8]) -> Result<DateTime<Utc>> {
    if packet.len() < PACKET_LEN {
        bail!(
            "SNTP response too short: expected at least {PACKET_LEN} bytes, got {}",
            packet.len()
        );
    }

    let mode = packet[0] & 0x07;
    if mode != MODE_SERVER && mode != MODE_BROADCAST {
        bail!("unexpected SNTP mode: {mode}");
    }

    let stratum = packet[1];
    if stratum == 0 || stratum > MAX_STRATUM {
        bail!("invalid SNTP stratum: {stratum}");
    }

    let secs = u32::from_be_bytes([packet[40], packet[41], packet[42], packet[43]]);
    let frac = u32::from_be_bytes([packet[44], packet[45], packet[46], packet[47]]);
    if secs == 0 {
        bail!("SNTP transmit timestamp is zero");
    }

    // RFC 4330 section 3: a clear top bit means era 1 (from 2036-02-07).
    let era_secs = if secs & 0x8000_0000 == 0 {
        secs as i64 + (1 << 32)
    } else {
        secs as i64
    };
    let unix_secs = era_secs - NTP_UNIX_OFFSET_SECS;
    let nanos = ((frac as u64 * 1_000_000_000) >> 32) as u32;

    DateTime::from_timestamp(unix_secs, nanos)
        .with_context(|| format!("SNTP timestamp out of range: {unix_secs}"))
}

/// Asks `server` (`host:port`) for the current time, corrected by half the
/// round trip.
pub async fn query(server: &str) -> Result<DateTime<Utc>> {
    let socket = UdpSocket::bind("0.0.0.0:0")
        .await
        .context("failed to bind SNTP socket")?;
    socket
        .connect(server)
        .await
        .with_context(|| format!("failed to resolve SNTP server: {server}"))?;

    let sent_at = Instant::now();
    socket
        .send(&request_packet())
        .await
        .context("failed to send SNTP request")?;

    let mut response = [0u8; PACKET_LEN];
    let len = timeout(REQUEST_TIMEOUT, socket.recv(&mut response))
        .await
        .with_context(|| format!("SNTP request timed out after {REQUEST_TIMEOUT:?}"))?
        .context("failed to receive SNTP response")?;
    let rtt = sent_at.elapsed();

    let transmitted = parse_response(&response[..len])?;
    let corrected = transmitted + TimeDelta::from_std(rtt / 2).unwrap_or(TimeDelta::zero());

    debug!(%server, ?rtt, %corrected, "SNTP response");

    Ok(corrected)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;

    use super::*;

    fn response(stratum: u8, secs: u32, frac: u32) -> [u8; PACKET_LEN] {
        let mut packet = [0u8; PACKET_LEN];
        packet[0] = 0x1C; // LI 0, VN 3, mode 4
        packet[1] = stratum;
        packet[40..44].copy_from_slice(&secs.to_be_bytes());
        packet[44..48].copy_from_slice(&frac.to_be_bytes());
        packet
    }

    fn ntp_secs(at: DateTime<Utc>) -> u32 {
        (at.timestamp() + NTP_UNIX_OFFSET_SECS) as u32
    }

    #[test]
    fn request_is_client_mode_v3() {
        let packet = request_packet();
        assert_eq!(packet[0] & 0x07, 3);
        assert_eq!((packet[0] >> 3) & 0x07, 3);
        assert!(packet[1..].iter().all(|&b| b == 0));
    }

    #[test]
    fn converts_transmit_timestamp_to_unix_time() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 6, 37, 52).unwrap();
        let parsed = parse_response(&response(2, ntp_secs(at), 1 << 31)).unwrap();
        assert_eq!(parsed, at + TimeDelta::milliseconds(500));
    }

    #[test]
    fn wraps_into_the_next_era() {
        let parsed = parse_response(&response(1, 1, 0)).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2036, 2, 7, 6, 28, 17).unwrap());
    }

    #[test]
    fn rejects_unsynchronized_servers() {
        let at = Utc.with_ymd_and_hms(2024, 1, 5, 6, 37, 52).unwrap();
        assert!(parse_response(&response(0, ntp_secs(at), 0)).is_err());
        assert!(parse_response(&response(16, ntp_secs(at), 0)).is_err());
    }

    #[test]
    fn rejects_client_mode_echo() {
        let mut packet = response(2, 1, 0);
        packet[0] = CLIENT_REQUEST_HEADER;
        assert!(parse_response(&packet).is_err());
    }

    #[test]
    fn rejects_short_and_empty_responses() {
        assert!(parse_response(&[0x1C, 2, 0, 0]).is_err());
        assert!(parse_response(&response(2, 0, 0)).is_err());
    }
}
