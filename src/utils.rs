pub fn pluralize(count: usize, singular: &str, plural: Option<&str>) -> String {
    if count == 1 {
        return singular.to_string();
    }

    match plural {
        Some(p) => p.to_string(),
        None => format!("{singular}s"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singular_and_plural() {
        assert_eq!(pluralize(1, "activity", Some("activities")), "activity");
        assert_eq!(pluralize(0, "activity", Some("activities")), "activities");
        assert_eq!(pluralize(25, "page", None), "pages");
    }
}
