//! Speed limit resolution for street edges.
//!
//! OSM `maxspeed` and `highway` tags arrive either as a single value or as a
//! list (`['30 mph', '40 mph']`, `30;40`). The first entry is used.

/// Speed assumed for unknown road classes, in mph
pub const DEFAULT_SPEED: f64 = 20.0;
/// 1 mph in meters per minute
pub const MPH_TO_METERS_PER_MINUTE: f64 = 26.8223;

/// Default speed (mph) for an OSM `highway` class
pub fn highway_speed(highway: &str) -> f64 {
    match highway {
        "motorway" | "trunk" => 50.0,
        "primary" | "secondary" | "tertiary" => 40.0,
        "motorway_link" | "trunk_link" | "primary_link" | "secondary_link" => 30.0,
        "tertiary_link" | "residential" | "living_street" | "unclassified" => 20.0,
        _ => DEFAULT_SPEED,
    }
}

/// First entry of a possibly multi-valued tag, without quotes or brackets
pub fn first_tag_value(tag: &str) -> Option<&str> {
    tag.trim()
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split([',', ';', '|'])
        .next()
        .map(|value| value.trim().trim_matches(|c| c == '\'' || c == '"').trim())
        .filter(|value| !value.is_empty())
}

/// Leading number of a `maxspeed` tag (`"30 mph"` -> 30). `None` for tags
/// without one, such as `"signals"` or `"none"`.
pub fn parse_maxspeed(tag: &str) -> Option<f64> {
    let value = first_tag_value(tag)?;
    let end = value
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
        .map_or(value.len(), |(idx, _)| idx);

    value[..end].parse().ok()
}

/// Resolved speed in mph: the tagged limit when it parses, otherwise the
/// default for the road class.
pub fn resolve_speed(maxspeed: Option<&str>, highway: Option<&str>) -> f64 {
    if let Some(tag) = maxspeed {
        if let Some(speed) = parse_maxspeed(tag) {
            return speed;
        }
        log::warn!("Unparseable maxspeed tag '{tag}', falling back to the road class default");
    }

    highway
        .and_then(first_tag_value)
        .map_or(DEFAULT_SPEED, highway_speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_maxspeed_variants() {
        assert_eq!(parse_maxspeed("30 mph"), Some(30.0));
        assert_eq!(parse_maxspeed("45"), Some(45.0));
        assert_eq!(parse_maxspeed("['25 mph', '35 mph']"), Some(25.0));
        assert_eq!(parse_maxspeed("40;50"), Some(40.0));
        assert_eq!(parse_maxspeed("15mph"), Some(15.0));
        assert_eq!(parse_maxspeed("signals"), None);
        assert_eq!(parse_maxspeed(""), None);
    }

    #[test]
    fn test_highway_table() {
        assert_eq!(highway_speed("motorway"), 50.0);
        assert_eq!(highway_speed("trunk_link"), 30.0);
        assert_eq!(highway_speed("secondary"), 40.0);
        assert_eq!(highway_speed("residential"), 20.0);
        assert_eq!(highway_speed("service"), DEFAULT_SPEED);
    }

    #[test]
    fn test_resolve_speed_fallbacks() {
        assert_eq!(resolve_speed(Some("35 mph"), Some("residential")), 35.0);
        assert_eq!(resolve_speed(None, Some("['primary', 'secondary']")), 40.0);
        assert_eq!(resolve_speed(Some("none"), Some("motorway")), 50.0);
        assert_eq!(resolve_speed(None, None), DEFAULT_SPEED);
    }
}
