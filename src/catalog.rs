//! List logic used by the catalog screens: filtering and ordering.

use crate::models::{Id, Lesson, Level, Vocabulary};

/// Records shown in `sequence` order.
pub trait Sequenced {
    fn sequence(&self) -> u32;
}

impl Sequenced for Level {
    fn sequence(&self) -> u32 {
        self.sequence
    }
}

impl Sequenced for Lesson {
    fn sequence(&self) -> u32 {
        self.sequence
    }
}

/// Stable sort by sequence number.
pub fn sort_by_sequence<T: Sequenced>(items: &mut [T]) {
    items.sort_by_key(Sequenced::sequence);
}

/// Sequence number to suggest for a new record: one past the highest.
pub fn next_sequence<T: Sequenced>(items: &[T]) -> u32 {
    items.iter().map(Sequenced::sequence).max().unwrap_or(0) + 1
}

/// Case-insensitive search over both texts, optionally limited to one category.
pub fn filter_vocabulary<'a>(
    items: &'a [Vocabulary],
    search: &str,
    category: Option<&Id>,
) -> Vec<&'a Vocabulary> {
    let needle = search.trim().to_lowercase();
    items
        .iter()
        .filter(|v| {
            needle.is_empty()
                || v.arabic_text.to_lowercase().contains(&needle)
                || v.indonesian_text.to_lowercase().contains(&needle)
        })
        .filter(|v| category.is_none_or(|c| v.category_ref() == Some(c)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn vocab(id: i64, arabic: &str, indonesian: &str, category: i64) -> Vocabulary {
        Vocabulary {
            id: Id::Int(id),
            arabic_text: arabic.to_string(),
            indonesian_text: indonesian.to_string(),
            category: Some(Category {
                id: Id::Int(category),
                name: format!("cat {}", category),
                created_at: String::new(),
                updated_at: String::new(),
            }),
            category_id: None,
            arabic_audio: None,
            indonesian_audio: None,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    fn lesson(id: i64, sequence: u32) -> Lesson {
        Lesson {
            id: Id::Int(id),
            title: format!("lesson {}", id),
            content: String::new(),
            sequence,
            level_id: Some(Id::Int(1)),
            created_at: String::new(),
            updated_at: String::new(),
        }
    }

    #[test]
    fn search_matches_either_text_ignoring_case() {
        let items = vec![
            vocab(1, "كِتَاب", "Buku", 1),
            vocab(2, "قَلَم", "pena", 1),
            vocab(3, "بَاب", "pintu", 2),
        ];
        let ids = |found: Vec<&Vocabulary>| found.iter().map(|v| v.id.clone()).collect::<Vec<_>>();

        assert_eq!(ids(filter_vocabulary(&items, "bUK", None)), [Id::Int(1)]);
        assert_eq!(ids(filter_vocabulary(&items, "قَلَم", None)), [Id::Int(2)]);
        assert_eq!(filter_vocabulary(&items, "  ", None).len(), 3);
        assert_eq!(
            ids(filter_vocabulary(&items, "p", Some(&Id::Int(2)))),
            [Id::Int(3)]
        );
    }

    #[test]
    fn ordering_and_next_sequence() {
        let mut lessons = vec![lesson(1, 3), lesson(2, 1), lesson(3, 2)];
        sort_by_sequence(&mut lessons);
        let order: Vec<_> = lessons.iter().map(|l| l.sequence).collect();
        assert_eq!(order, [1, 2, 3]);
        assert_eq!(next_sequence(&lessons), 4);
        assert_eq!(next_sequence::<Lesson>(&[]), 1);
    }
}
