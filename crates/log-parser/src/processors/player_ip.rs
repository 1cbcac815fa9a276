use async_trait::async_trait;
use cozy_core::models::{Log, Order, Ordered};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::net::Ipv4Addr;

use super::Processor;
use crate::parsers::pattern;

pub const REDACTED: &str = "[redacted]";

lazy_static! {
    static ref CONNECTION: Regex = pattern(r"(?i)Connecting to ([^\s,]+), ?\d+");
    /// `203.0.113.5:51234`, as printed for player logins. The port keeps four
    /// part mod versions from matching.
    static ref SOCKET_ADDRESS: Regex = pattern(r"(?:^|[^\w.])((?:\d{1,3}\.){3}\d{1,3}):\d{1,5}\b");
}

/// Redacts server and player addresses from the stored log text and warns
/// about them. Loopback and unspecified addresses are left alone.
pub struct PlayerIpProcessor;

impl Ordered for PlayerIpProcessor {
    fn identifier(&self) -> &str {
        "player-ip"
    }

    fn order(&self) -> Order {
        Order::Early
    }
}

#[async_trait]
impl Processor for PlayerIpProcessor {
    async fn process(&self, log: &mut Log) -> eyre::Result<()> {
        let connections = CONNECTION
            .captures_iter(&log.content)
            .map(|captures| captures[1].to_string());
        let sockets = SOCKET_ADDRESS
            .captures_iter(&log.content)
            .map(|captures| captures[1].to_string())
            .filter(|address| is_public(address));

        let addresses: BTreeSet<String> = connections
            .chain(sockets)
            .filter(|address| address != REDACTED)
            .collect();

        if addresses.is_empty() {
            return Ok(());
        }

        for address in &addresses {
            log.content = log.content.replace(address.as_str(), REDACTED);
        }

        log.add_message(
            "This log contains server or player IP addresses. They have been redacted here, \
             but consider removing them before sharing logs publicly.",
        );
        log.mark_problem();

        Ok(())
    }
}

fn is_public(address: &str) -> bool {
    address
        .parse::<Ipv4Addr>()
        .is_ok_and(|ip| !ip.is_loopback() && !ip.is_unspecified())
}
