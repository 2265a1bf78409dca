//! Catalog entity vocabulary

closed_vocabulary! {
    /// Catalog entity a command targets
    pub enum DataType {
        SeisEvent => "seisevent",
        Hypocentre => "hypocentre",
        Phase => "phase",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(DataType::parse("hypocentre"), DataType::Hypocentre);
        assert_eq!(
            DataType::parse("origin"),
            DataType::Unrecognized("origin".to_string())
        );
    }

    #[test]
    fn test_display_matches_persisted_form() {
        assert_eq!(DataType::SeisEvent.to_string(), "seisevent");
    }
}
