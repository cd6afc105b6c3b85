//! Static event catalog: the read-only list of everything a user can swipe on.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;

use crate::{
    domain::{Event, EventId},
    error::CatalogError,
};

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    events: Vec<Event>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate event ids.
    pub fn new(events: Vec<Event>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(events.len());
        for event in &events {
            if !seen.insert(event.id) {
                return Err(CatalogError::DuplicateEventId(event.id));
            }
        }
        Ok(Self { events })
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let events: Vec<Event> = serde_json::from_str(raw)?;
        Self::new(events)
    }

    pub fn builtin() -> Self {
        Self {
            events: builtin_events(),
        }
    }

    pub fn all(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn at(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    pub fn by_category(&self, category: &str) -> Vec<&Event> {
        self.events
            .iter()
            .filter(|event| event.category == category)
            .collect()
    }

    pub fn by_tag(&self, tag: &str) -> Vec<&Event> {
        self.events.iter().filter(|event| event.has_tag(tag)).collect()
    }

    pub fn all_tags(&self) -> Vec<String> {
        self.events
            .iter()
            .flat_map(|event| event.tags.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Case-insensitive substring match over title, description, location,
    /// category and tags.
    pub fn search(&self, query: &str) -> Vec<&Event> {
        let needle = query.to_lowercase();
        self.events
            .iter()
            .filter(|event| {
                event.title.to_lowercase().contains(&needle)
                    || event.description.to_lowercase().contains(&needle)
                    || event.location.to_lowercase().contains(&needle)
                    || event.category.to_lowercase().contains(&needle)
                    || event
                        .tags
                        .iter()
                        .any(|tag| tag.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

/// Formats an ISO `YYYY-MM-DD` date as `Jul 15, 2024`. Anything else is
/// returned untouched.
pub fn format_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

#[allow(clippy::too_many_arguments)]
fn event(
    id: i64,
    title: &str,
    date: &str,
    time: &str,
    location: &str,
    category: &str,
    price: &str,
    description: &str,
    emoji: &str,
    tags: &[&str],
) -> Event {
    Event {
        id: EventId(id),
        title: title.to_string(),
        date: date.to_string(),
        time: time.to_string(),
        location: location.to_string(),
        category: category.to_string(),
        price: price.to_string(),
        description: description.to_string(),
        emoji: emoji.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
    }
}

fn builtin_events() -> Vec<Event> {
    vec![
        event(
            1,
            "Summer Music Festival 2024",
            "2024-07-15",
            "18:00",
            "Central Park, NYC",
            "Music",
            "$75",
            "Join us for an unforgettable evening of live music featuring top artists from around the world.",
            "🎵",
            &["Music", "Entertainment", "Live Performance"],
        ),
        event(
            2,
            "Tech Innovation Summit",
            "2024-08-20",
            "09:00",
            "Convention Center, SF",
            "Technology",
            "$150",
            "Explore the latest trends in AI, blockchain, and emerging technologies with industry leaders.",
            "💻",
            &["AIML", "Technology", "Innovation", "Networking"],
        ),
        event(
            3,
            "Food & Wine Tasting",
            "2024-06-30",
            "17:00",
            "Napa Valley, CA",
            "Food",
            "$95",
            "Savor exquisite wines paired with gourmet cuisine from renowned chefs.",
            "🍷",
            &["Food", "Wine", "Culinary", "Luxury"],
        ),
        event(
            4,
            "Stand-up Comedy Night",
            "2024-07-08",
            "20:00",
            "Laugh Factory, LA",
            "Comedy",
            "$35",
            "Get ready to laugh with the best comedians in town for a night of pure entertainment.",
            "😂",
            &["Comedy", "Entertainment", "Nightlife"],
        ),
        event(
            5,
            "Art Gallery Opening",
            "2024-07-22",
            "19:00",
            "Modern Art Museum",
            "Art",
            "Free",
            "Experience contemporary art from emerging artists in an exclusive gallery opening.",
            "🎨",
            &["Art", "Culture", "Exhibition", "Free Event"],
        ),
        event(
            6,
            "Yoga & Wellness Retreat",
            "2024-08-05",
            "07:00",
            "Malibu Beach, CA",
            "Wellness",
            "$120",
            "Rejuvenate your mind and body with morning yoga sessions by the ocean.",
            "🧘",
            &["Wellness", "Yoga", "Health", "Beach"],
        ),
        event(
            7,
            "Startup Pitch Competition",
            "2024-07-28",
            "14:00",
            "Silicon Valley Hub",
            "Business",
            "$50",
            "Watch innovative startups pitch their ideas to top venture capitalists.",
            "🚀",
            &["Business", "Startup", "Pitching", "Investment", "DSA"],
        ),
        event(
            8,
            "Jazz Night Under Stars",
            "2024-08-12",
            "19:30",
            "Rooftop Lounge, Chicago",
            "Music",
            "$60",
            "Enjoy smooth jazz performances with stunning city views on our rooftop venue.",
            "🎺",
            &["Music", "Jazz", "Rooftop", "Nightlife"],
        ),
        event(
            9,
            "AI & Machine Learning Workshop",
            "2024-09-15",
            "10:00",
            "Tech Institute, Boston",
            "Technology",
            "$200",
            "Hands-on workshop covering the fundamentals of AI and machine learning algorithms.",
            "🤖",
            &["AIML", "Technology", "Workshop", "Learning", "Hands-on"],
        ),
        event(
            10,
            "Cybersecurity Conference 2024",
            "2024-10-20",
            "09:00",
            "Security Center, DC",
            "Technology",
            "$180",
            "Learn about the latest cybersecurity threats and defense strategies from industry experts.",
            "🔒",
            &["CyberSecurity", "Technology", "Security", "Conference", "Networking"],
        ),
        event(
            11,
            "Web Development Bootcamp",
            "2024-11-05",
            "09:00",
            "Coding Academy, Austin",
            "Technology",
            "$300",
            "Intensive 3-day bootcamp covering modern web development technologies and frameworks.",
            "🌐",
            &["WebDevelopment", "Technology", "Bootcamp", "Learning", "Coding"],
        ),
        event(
            12,
            "Data Structures & Algorithms Masterclass",
            "2024-12-10",
            "14:00",
            "Computer Science Lab, Stanford",
            "Education",
            "$150",
            "Master DSA concepts with practical examples and coding challenges.",
            "📊",
            &["DSA", "Education", "Computer Science", "Coding", "Algorithms"],
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_unique_ids() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.len(), 12);
        Catalog::new(catalog.all().to_vec()).expect("builtin ids are unique");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut events = Catalog::builtin().all().to_vec();
        events.push(events[0].clone());
        let err = Catalog::new(events).expect_err("duplicate id");
        assert!(matches!(err, CatalogError::DuplicateEventId(EventId(1))));
    }

    #[test]
    fn from_json_reports_malformed_payload() {
        let err = Catalog::from_json("{not json").expect_err("malformed");
        assert!(matches!(err, CatalogError::Malformed(_)));
    }

    #[test]
    fn filters_by_category_and_tag() {
        let catalog = Catalog::builtin();
        let music: Vec<_> = catalog.by_category("Music").iter().map(|e| e.id).collect();
        assert_eq!(music, vec![EventId(1), EventId(8)]);

        let dsa: Vec<_> = catalog.by_tag("DSA").iter().map(|e| e.id).collect();
        assert_eq!(dsa, vec![EventId(7), EventId(12)]);
    }

    #[test]
    fn all_tags_are_sorted_and_unique() {
        let tags = Catalog::builtin().all_tags();
        let mut sorted = tags.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(tags, sorted);
        assert!(tags.contains(&"Live Performance".to_string()));
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let catalog = Catalog::builtin();
        let by_location: Vec<_> = catalog.search("napa").iter().map(|e| e.id).collect();
        assert_eq!(by_location, vec![EventId(3)]);

        let by_tag: Vec<_> = catalog.search("jazz").iter().map(|e| e.id).collect();
        assert_eq!(by_tag, vec![EventId(8)]);

        assert!(catalog.search("no such thing").is_empty());
    }

    #[test]
    fn formats_iso_dates() {
        assert_eq!(format_date("2024-07-15"), "Jul 15, 2024");
        assert_eq!(format_date("2024-12-01"), "Dec 1, 2024");
        assert_eq!(format_date("someday"), "someday");
    }
}
