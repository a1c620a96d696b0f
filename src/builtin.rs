//! Built-in filters and the team rosters they are generated from.

use crate::data::filter::{equals, numeric, present};
use crate::registry::FilterDefinition;

/// Content creators, as they appear in the `content` column.
pub const CONTENT_CREATORS: &[&str] = &[
    "MONICA", "TAZKIYA", "SHAFIRA", "VORA", "BUNGA", "NOURMA", "PHANIE", "AUZIAH", "GITA",
    "YASYI", "ABI", "ATI", "DEWI", "RESTY", "NABILLA", "DZULFIKAR", "DIMAS", "NADIAUM", "BIMA",
    "LUI", "INTA", "HANIFA", "OKTA", "VICKY", "ALYA", "LINDY", "AHDANIA", "HASNA", "NOYA", "JULI",
    "GINA", "RENNI", "UNIKE", "RAHMAH", "SYAHID", "WINNY", "EVINTA", "NAIMMAH", "MELATI", "DELA",
    "WITRI",
];

/// Digital marketers, as they appear in the `dm` column.
pub const DIGITAL_MARKETERS: &[&str] = &[
    "MIQDAD", "NAUFAL", "HAMAM", "TAUFIK", "CITRA", "AKBAR", "LUTHFI", "DANNY", "ARIES", "IBECK",
    "ILHAM", "DHANI", "ALVIN", "KEVIN", "FAHMI", "DINI", "ICA", "RIEFAN", "NABILAH",
];

/// Values of the `SQUAD` column.
pub const SQUADS: &[&str] = &["AREA 1", "AREA 2", "AREA 3", "PROGRAM", "HOSPITAL", "INBOUND"];

/// The seed set, in registration order.
pub(crate) fn seed() -> Vec<FilterDefinition> {
    let mut defs = vec![FilterDefinition::new(
        "kevin_squad",
        "Kevin Squad (AREA 2)",
        "campaign",
        "Filter for AREA 2 squad data (Kevin's team)",
        equals("SQUAD", "AREA 2"),
    )];

    for squad in SQUADS {
        let key = format!("squad_{}", squad.to_lowercase().replace(' ', ""));
        defs.push(FilterDefinition::new(
            key.clone(),
            format!("Squad {squad}"),
            key,
            format!("Filter for {squad} squad"),
            equals("SQUAD", *squad),
        ));
    }

    defs.push(FilterDefinition::new(
        "content_active",
        "Active Content",
        "content_active",
        "Filter for campaigns with active content",
        present("content"),
    ));
    for creator in ["Monica", "Tazkiya", "Shafira"] {
        let key = format!("content_{}", creator.to_lowercase());
        defs.push(FilterDefinition::new(
            key.clone(),
            format!("{creator} Content"),
            key,
            format!("Filter for {creator} content campaigns"),
            equals("content", creator.to_uppercase()),
        ));
    }

    defs.push(FilterDefinition::new(
        "dm_active",
        "Active DM Campaigns",
        "dm_active",
        "Filter for campaigns with assigned DM",
        present("dm"),
    ));
    for dm in ["Kevin", "Miqdad", "Naufal", "Hamam", "Taufik"] {
        let key = format!("dm_{}", dm.to_lowercase());
        defs.push(FilterDefinition::new(
            key.clone(),
            format!("{dm} DM Campaigns"),
            key,
            format!("Filter for campaigns managed by {dm}"),
            equals("dm", dm.to_uppercase()),
        ));
    }

    defs.extend([
        FilterDefinition::new(
            "isu_active",
            "Active Issues",
            "isu_active",
            "Filter for campaigns with defined issues",
            present("isu"),
        ),
        FilterDefinition::new(
            "visual_active",
            "Active Visuals",
            "visual_active",
            "Filter for campaigns with visual elements",
            present("visual"),
        ),
        FilterDefinition::new(
            "high_performers",
            "High Performers",
            "high_performers",
            "Filter for high-performing campaigns (ROAS > 2.0)",
            numeric("roas_ads_l30d", |roas| roas > 2.0),
        ),
        FilterDefinition::new(
            "low_performers",
            "Low Performers",
            "low_performers",
            "Filter for low-performing campaigns (ROAS < 1.0)",
            numeric("roas_ads_l30d", |roas| roas < 1.0),
        ),
        FilterDefinition::new(
            "active_campaigns",
            "Active Campaigns",
            "active_campaigns",
            "Filter for currently active campaigns",
            equals("status_ads", "ACTIVE"),
        ),
        FilterDefinition::new(
            "paused_campaigns",
            "Paused Campaigns",
            "paused_campaigns",
            "Filter for paused campaigns",
            equals("status_ads", "PAUSED"),
        ),
        FilterDefinition::new(
            "high_spend",
            "High Spend Campaigns",
            "high_spend",
            "Filter for campaigns with high spending (>100k last 30 days)",
            numeric("cost_l30d", |cost| cost > 100_000.0),
        ),
        // Zero-cost rows are excluded here but high_spend has no upper bound.
        FilterDefinition::new(
            "low_spend",
            "Low Spend Campaigns",
            "low_spend",
            "Filter for campaigns with low spending (<10k last 30 days)",
            numeric("cost_l30d", |cost| cost > 0.0 && cost < 10_000.0),
        ),
    ]);

    defs
}
