//! Command type vocabulary

closed_vocabulary! {
    /// Kind of analyst action a command envelope describes
    pub enum CommandType {
        PhaseEdit => "phaseedit",
        HypocentreEdit => "hypocentreedit",
        SeisEventRelocate => "seiseventrelocate",
        SetPrime => "setprime",
        SeisEventBanish => "seiseventbanish",
        SeisEventUnbanish => "seiseventunbanish",
        Assess => "assess",
        MoveHypocentre => "movehypocentre",
        DeleteHypocentre => "deletehypocentre",
        CreateEvent => "createevent",
        /// Batch built by the command merger
        Merge => "merge",
        Commit => "commit",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(CommandType::parse("setprime"), CommandType::SetPrime);
        assert_eq!(CommandType::parse("merge"), CommandType::Merge);
        assert_eq!(CommandType::KNOWN.len(), 12);
    }

    #[test]
    fn test_every_known_value_round_trips_through_text() {
        for known in CommandType::KNOWN {
            assert_eq!(&CommandType::parse(known.as_str()), known);
            assert!(known.is_recognized());
        }
    }

    #[test]
    fn test_unrecognized_keeps_text() {
        let ct = CommandType::parse("SetPrime");
        assert!(!ct.is_recognized());
        assert_eq!(ct.as_str(), "SetPrime");
        assert_eq!(String::from(ct), "SetPrime");
    }

    #[test]
    fn test_serde_uses_plain_string() {
        let json = serde_json::to_string(&CommandType::SeisEventBanish).unwrap();
        assert_eq!(json, "\"seiseventbanish\"");

        let back: CommandType = serde_json::from_str("\"relocate\"").unwrap();
        assert_eq!(back, CommandType::Unrecognized("relocate".to_string()));
    }
}
