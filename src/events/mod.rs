//! Block event decoding and auction alert extraction.
//!
//! A node reports each block's emitted events as a flat mapping from
//! `"<category>.<attribute>"` keys to arrays of string values. Attribute
//! arrays within one category are index-aligned: position `i` across the
//! arrays describes the same logical occurrence.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

const AUCTION_ID_KEY: &str = "auction_start.auction_id";
const AUCTION_TYPE_KEY: &str = "auction_start.auction_type";
const AUCTION_BID_KEY: &str = "auction_start.bid";
const AUCTION_LOT_KEY: &str = "auction_start.lot";
const AUCTION_MAX_BID_KEY: &str = "auction_start.max_bid";

/// One block's worth of emitted events.
///
/// Decoded as an open mapping rather than a closed record: keys outside
/// the auction-start schema are kept but never read, so event types added
/// by node upgrades do not break decoding.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct BlockEvents(HashMap<String, Vec<String>>);

impl BlockEvents {
    pub fn from_value(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    fn attr(&self, key: &str, idx: usize) -> String {
        self.0
            .get(key)
            .and_then(|values| values.get(idx))
            .cloned()
            .unwrap_or_default()
    }

    /// Extract one alert per auction-start occurrence, in array order.
    pub fn auction_starts(&self) -> Vec<AuctionAlert> {
        let ids = match self.0.get(AUCTION_ID_KEY) {
            Some(ids) if !ids.is_empty() => ids,
            _ => return Vec::new(),
        };

        ids.iter()
            .enumerate()
            .map(|(idx, id)| AuctionAlert {
                id: id.clone(),
                auction_type: self.attr(AUCTION_TYPE_KEY, idx),
                bid: self.attr(AUCTION_BID_KEY, idx),
                lot: self.attr(AUCTION_LOT_KEY, idx),
                max_bid: self.attr(AUCTION_MAX_BID_KEY, idx),
            })
            .collect()
    }
}

/// A single auction-start occurrence lifted out of a block's events.
///
/// All fields pass through verbatim: the node's coin encoding is not
/// canonical, so no numeric parsing happens here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionAlert {
    pub id: String,
    pub auction_type: String,
    pub bid: String,
    pub lot: String,
    pub max_bid: String,
}

impl fmt::Display for AuctionAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "New Auction Started:\nID: {}\nType: {}\nBid: {}\nLot {}\nMax Bid {}",
            self.id, self.auction_type, self.bid, self.lot, self.max_bid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn batch(value: serde_json::Value) -> BlockEvents {
        BlockEvents::from_value(value).expect("batch should decode")
    }

    #[test]
    fn test_extracts_one_occurrence_per_id() {
        let events = batch(json!({
            "tm.event": ["NewBlock"],
            "auction_start.auction_id": ["7", "8"],
            "auction_start.auction_type": ["collateral", "surplus"],
            "auction_start.bid": ["100ukava", "0ukava"],
            "auction_start.lot": ["50ukava", "200ukava"],
            "auction_start.max_bid": ["500ukava", "0ukava"],
        }));

        let alerts = events.auction_starts();
        assert_eq!(alerts.len(), 2);
        assert_eq!(
            alerts[0],
            AuctionAlert {
                id: "7".to_string(),
                auction_type: "collateral".to_string(),
                bid: "100ukava".to_string(),
                lot: "50ukava".to_string(),
                max_bid: "500ukava".to_string(),
            }
        );
        assert_eq!(alerts[1].id, "8");
        assert_eq!(alerts[1].auction_type, "surplus");
    }

    #[test]
    fn test_no_auction_keys_yields_no_occurrences() {
        let events = batch(json!({
            "tm.event": ["NewBlock"],
            "transfer.amount": ["12ukava"],
        }));
        assert!(events.auction_starts().is_empty());
    }

    #[test]
    fn test_empty_id_array_yields_no_occurrences() {
        let events = batch(json!({
            "auction_start.auction_id": [],
        }));
        assert!(events.auction_starts().is_empty());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let events = batch(json!({
            "brand_new_module.brand_new_attr": ["whatever"],
            "auction_start.auction_id": ["3"],
            "auction_start.auction_type": ["debt"],
            "auction_start.bid": ["1ukava"],
            "auction_start.lot": ["2ukava"],
            "auction_start.max_bid": ["9ukava"],
        }));
        assert_eq!(events.auction_starts().len(), 1);
    }

    #[test]
    fn test_missing_attribute_values_render_empty() {
        // ids present but the other arrays absent; fields come out empty
        // rather than panicking
        let events = batch(json!({
            "auction_start.auction_id": ["42"],
        }));

        let alerts = events.auction_starts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].id, "42");
        assert_eq!(alerts[0].auction_type, "");
        assert_eq!(alerts[0].bid, "");
    }

    #[test]
    fn test_non_string_array_payload_is_a_decode_error() {
        let result = BlockEvents::from_value(json!({
            "auction_start.auction_id": "not-an-array",
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_display_contains_fields_in_order() {
        let alert = AuctionAlert {
            id: "7".to_string(),
            auction_type: "collateral".to_string(),
            bid: "100ukava".to_string(),
            lot: "50ukava".to_string(),
            max_bid: "500ukava".to_string(),
        };

        let text = alert.to_string();
        let positions: Vec<usize> = ["7", "collateral", "100ukava", "50ukava", "500ukava"]
            .iter()
            .map(|needle| text.find(needle).expect("field missing from output"))
            .collect();
        assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

        // formatting is pure: same input, same output
        assert_eq!(text, alert.to_string());
    }

    #[test]
    fn test_display_renders_empty_fields_as_empty() {
        let alert = AuctionAlert {
            id: "1".to_string(),
            auction_type: String::new(),
            bid: String::new(),
            lot: String::new(),
            max_bid: String::new(),
        };
        let text = alert.to_string();
        assert!(text.contains("ID: 1"));
        assert!(text.contains("Type: \n"));
    }
}
