// shelfkeep-core/src/library.rs
//! Book registry: books with ratings, their authors and library members
//!
//! Each book is mirrored into a [`Catalog`] entity (title, genre, average
//! rating as the numeric attribute, rating count as the quantity) so genre
//! filters and rankings reuse the catalog operations.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Direction};
use crate::entity::{Entity, EntityId};
use crate::error::{CatalogError, Result};
use crate::event::{Attribute, EntityKind, EventSink, LogSink};
use crate::log_debug;

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRating")]
pub struct Rating {
    pub user: EntityId,
    score: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Rating {
    /// Scores outside 1..=5 are rejected
    pub fn new(user: EntityId, score: u8, comment: Option<&str>) -> Result<Self> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
            return Err(CatalogError::invalid("score", score));
        }
        Ok(Rating {
            user,
            score,
            comment: comment.map(str::to_string),
        })
    }

    pub fn score(&self) -> u8 {
        self.score
    }
}

/// Wire shape of a rating before the score check
#[derive(Deserialize)]
struct RawRating {
    user: EntityId,
    score: u8,
    #[serde(default)]
    comment: Option<String>,
}

impl TryFrom<RawRating> for Rating {
    type Error = CatalogError;

    fn try_from(raw: RawRating) -> Result<Self> {
        let mut rating = Rating::new(raw.user, raw.score, None)?;
        rating.comment = raw.comment;
        Ok(rating)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    pub genre: String,
    pub publication_year: i32,
    pub author_id: EntityId,
    #[serde(default)]
    pub ratings: Vec<Rating>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        publication_year: i32,
        author_id: EntityId,
    ) -> Self {
        Book {
            id: EntityId::new_object_id(),
            title: title.into(),
            genre: genre.into(),
            publication_year,
            author_id,
            ratings: Vec::new(),
        }
    }

    pub fn with_rating(mut self, rating: Rating) -> Self {
        self.ratings.push(rating);
        self
    }

    pub fn rating_count(&self) -> usize {
        self.ratings.len()
    }

    /// Mean score, `None` for an unrated book
    pub fn average_rating(&self) -> Option<f64> {
        if self.ratings.is_empty() {
            return None;
        }
        let total: u32 = self.ratings.iter().map(|r| r.score as u32).sum();
        Some(total as f64 / self.ratings.len() as f64)
    }

    /// Catalog view of the book
    pub fn to_entity(&self) -> Entity {
        Entity {
            id: self.id.clone(),
            name: self.title.clone(),
            category: self.genre.clone(),
            price: self.average_rating().unwrap_or(0.0),
            stock: self.rating_count() as i64,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: EntityId,
    pub name: String,
    pub nationality: String,
    pub birth_year: i32,
}

impl Author {
    pub fn new(name: impl Into<String>, nationality: impl Into<String>, birth_year: i32) -> Self {
        Author {
            id: EntityId::new_object_id(),
            name: name.into(),
            nationality: nationality.into(),
            birth_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: EntityId,
    pub name: String,
    pub email: String,
    pub join_date: NaiveDate,
}

impl Member {
    pub fn new(name: impl Into<String>, email: impl Into<String>, join_date: NaiveDate) -> Self {
        Member {
            id: EntityId::new_object_id(),
            name: name.into(),
            email: email.into(),
            join_date,
        }
    }
}

pub struct Library<K: EventSink = LogSink> {
    authors: IndexMap<EntityId, Author>,
    members: IndexMap<EntityId, Member>,
    books: IndexMap<EntityId, Book>,
    catalog: Catalog<K>,
}

impl Library<LogSink> {
    pub fn new() -> Self {
        Library::with_sink(LogSink)
    }

    /// Three authors, three members and five rated books
    pub fn sample() -> Self {
        let mut library = Library::new();
        library.seed_sample();
        library
    }
}

impl Default for Library<LogSink> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: EventSink> Library<K> {
    pub fn with_sink(sink: K) -> Self {
        Library {
            authors: IndexMap::new(),
            members: IndexMap::new(),
            books: IndexMap::new(),
            catalog: Catalog::with_sink(sink).of_kind(EntityKind::Book),
        }
    }

    pub fn catalog(&self) -> &Catalog<K> {
        &self.catalog
    }

    pub fn sink_mut(&mut self) -> &mut K {
        self.catalog.sink_mut()
    }

    // ========== REGISTRATION ==========

    pub fn add_author(&mut self, author: Author) -> EntityId {
        let id = author.id.clone();
        self.authors.insert(id.clone(), author);
        id
    }

    pub fn add_member(&mut self, member: Member) -> EntityId {
        let id = member.id.clone();
        self.members.insert(id.clone(), member);
        id
    }

    /// Register a book and its catalog entity
    pub fn add_book(&mut self, book: Book) -> EntityId {
        let id = book.id.clone();
        self.catalog.add(book.to_entity());
        self.books.insert(id.clone(), book);
        id
    }

    /// Remove a member; false when no such member exists
    pub fn remove_member(&mut self, id: &EntityId) -> bool {
        match self.members.shift_remove(id) {
            Some(member) => {
                log_debug!("removed member {}", member.name);
                true
            }
            None => false,
        }
    }

    // ========== UPDATES ==========

    /// Append a rating and refresh the book's count and average
    ///
    /// Nothing changes when the book is unknown.
    pub fn add_rating(&mut self, book_id: &EntityId, rating: Rating) -> Result<()> {
        let Some(book) = self.books.get_mut(book_id) else {
            return Err(CatalogError::NotFound(book_id.clone()));
        };
        if !self.catalog.contains(book_id) {
            return Err(CatalogError::NotFound(book_id.clone()));
        }
        book.ratings.push(rating);

        let count = book.rating_count() as i64;
        let average = book.average_rating().unwrap_or(0.0);
        self.catalog.update_stock(book_id, count)?;
        self.catalog.update_price(book_id, average)?;
        Ok(())
    }

    pub fn set_publication_year(&mut self, book_id: &EntityId, year: i32) -> Result<&Book> {
        let book = self
            .books
            .get_mut(book_id)
            .ok_or_else(|| CatalogError::NotFound(book_id.clone()))?;
        book.publication_year = year;
        Ok(&*book)
    }

    // ========== LOOKUPS ==========

    pub fn authors(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }

    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn books(&self) -> impl Iterator<Item = &Book> {
        self.books.values()
    }

    pub fn book(&self, id: &EntityId) -> Option<&Book> {
        self.books.get(id)
    }

    pub fn find_book_by_title(&self, title: &str) -> Option<&Book> {
        self.books().find(|b| b.title == title)
    }

    pub fn find_author_by_name(&self, name: &str) -> Option<&Author> {
        self.authors().find(|a| a.name == name)
    }

    pub fn find_member_by_name(&self, name: &str) -> Option<&Member> {
        self.members().find(|m| m.name == name)
    }

    // ========== QUERIES ==========

    /// Books published strictly after `year`
    pub fn books_published_after(&self, year: i32) -> Vec<&Book> {
        self.books().filter(|b| b.publication_year > year).collect()
    }

    pub fn books_by_genre(&self, genre: &str) -> Vec<&Book> {
        self.resolve(self.catalog.filter_by_category(genre))
    }

    /// Authors with at least one book in `genre`, in registration order
    pub fn authors_of_genre(&self, genre: &str) -> Vec<&Author> {
        self.authors()
            .filter(|a| {
                self.books()
                    .any(|b| b.author_id == a.id && b.genre == genre)
            })
            .collect()
    }

    /// Members whose join date is on or after `since`
    pub fn members_joined_since(&self, since: NaiveDate) -> Vec<&Member> {
        self.members().filter(|m| m.join_date >= since).collect()
    }

    /// Rated books with an average strictly above `min_average`
    pub fn highly_rated(&self, min_average: f64) -> Vec<&Book> {
        let above = self
            .catalog
            .rank_by_threshold(Attribute::Price, min_average, Direction::Above);
        self.resolve(above)
            .into_iter()
            .filter(|b| !b.ratings.is_empty())
            .collect()
    }

    /// The `limit` books with the most ratings
    pub fn most_rated(&self, limit: usize) -> Vec<&Book> {
        self.resolve(self.catalog.top_by(|e| e.stock() as f64, limit))
    }

    fn resolve(&self, entities: Vec<&Entity>) -> Vec<&Book> {
        entities
            .into_iter()
            .filter_map(|e| self.books.get(e.id()))
            .collect()
    }

    /// Register the sample authors, members and books
    pub fn seed_sample(&mut self) {
        let rowling = self.add_author(Author::new("J.K. Rowling", "British", 1965));
        let martin = self.add_author(Author::new("George R.R. Martin", "American", 1948));
        let asimov = self.add_author(Author::new("Isaac Asimov", "American", 1920));

        let alice = self.add_member(Member::new(
            "Alice Johnson",
            "alice@example.com",
            date(2024, 1, 15),
        ));
        let bob = self.add_member(Member::new("Bob Smith", "bob@example.com", date(2024, 3, 20)));
        let carol = self.add_member(Member::new(
            "Carol Davis",
            "carol@example.com",
            date(2024, 6, 10),
        ));

        let rate = |user: &EntityId, score: u8, comment: &str| Rating {
            user: user.clone(),
            score,
            comment: Some(comment.to_string()),
        };

        let books = [
            Book::new("Harry Potter and the Philosopher's Stone", "Fantasy", 1997, rowling.clone())
                .with_rating(rate(&alice, 5, "Amazing book!"))
                .with_rating(rate(&bob, 4, "Great read")),
            Book::new("A Game of Thrones", "Fantasy", 1996, martin)
                .with_rating(rate(&alice, 5, "Epic story"))
                .with_rating(rate(&carol, 4, "Complex characters")),
            Book::new("Foundation", "Science Fiction", 1951, asimov.clone())
                .with_rating(rate(&bob, 5, "Sci-fi classic")),
            Book::new("The Caves of Steel", "Science Fiction", 1954, asimov)
                .with_rating(rate(&alice, 4, "Great detective story"))
                .with_rating(rate(&bob, 5, "Brilliant"))
                .with_rating(rate(&carol, 4, "Enjoyable read")),
            Book::new("Harry Potter and the Chamber of Secrets", "Fantasy", 1998, rowling)
                .with_rating(rate(&carol, 5, "Loved it!")),
        ];
        for book in books {
            self.add_book(book);
        }
    }
}

impl<K: EventSink + Default> Library<K> {
    /// Sample data with a caller-chosen sink type
    pub fn sample_with_default_sink() -> Self {
        let mut library = Library::with_sink(K::default());
        library.seed_sample();
        library
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{CatalogEvent, Change, RecordingSink};

    fn sample() -> Library<RecordingSink> {
        Library::sample_with_default_sink()
    }

    fn titles(books: &[&Book]) -> Vec<String> {
        books.iter().map(|b| b.title.clone()).collect()
    }

    #[test]
    fn test_rating_bounds() {
        let user = EntityId::from("u");
        assert!(Rating::new(user.clone(), 0, None).is_err());
        assert!(Rating::new(user.clone(), 6, None).is_err());
        assert_eq!(Rating::new(user, 5, Some("ok")).unwrap().score(), 5);
    }

    #[test]
    fn test_rating_decode_checks_score() {
        let ok: Rating = serde_json::from_str(r#"{"user": 1, "score": 4, "comment": "fine"}"#).unwrap();
        assert_eq!(ok.score(), 4);
        assert_eq!(ok.comment.as_deref(), Some("fine"));

        assert!(serde_json::from_str::<Rating>(r#"{"user": 1, "score": 0}"#).is_err());
        assert!(serde_json::from_str::<Rating>(r#"{"user": 1, "score": 6}"#).is_err());

        let book = r#"{
            "id": "b-1", "title": "Dune", "genre": "Science Fiction",
            "publicationYear": 1965, "authorId": "herbert",
            "ratings": [{"user": 1, "score": 5}, {"user": 2, "score": 9}]
        }"#;
        assert!(serde_json::from_str::<Book>(book).is_err());
    }

    #[test]
    fn test_sample_join_dates() {
        let library = sample();
        let dates: Vec<_> = library.members().map(|m| m.join_date.to_string()).collect();
        assert_eq!(dates, ["2024-01-15", "2024-03-20", "2024-06-10"]);
    }

    #[test]
    fn test_failed_rating_leaves_book_untouched() {
        let mut library = sample();
        let foundation = library.find_book_by_title("Foundation").unwrap().id.clone();
        library.catalog.remove(&foundation);
        library.sink_mut().drain();

        let rating = Rating::new(EntityId::from("reader"), 4, None).unwrap();
        assert!(library.add_rating(&foundation, rating).unwrap_err().is_not_found());
        assert_eq!(library.book(&foundation).unwrap().rating_count(), 1);
        assert!(library.sink_mut().events().is_empty());
    }

    #[test]
    fn test_average_and_projection() {
        let library = sample();
        let caves = library.find_book_by_title("The Caves of Steel").unwrap();
        assert_eq!(caves.rating_count(), 3);
        let avg = caves.average_rating().unwrap();
        assert!((avg - 13.0 / 3.0).abs() < 1e-9);

        let entity = library.catalog().get(&caves.id).unwrap();
        assert_eq!(entity.category, "Science Fiction");
        assert_eq!(entity.stock(), 3);
    }

    #[test]
    fn test_genre_filter() {
        let library = sample();
        assert_eq!(library.books_by_genre("Fantasy").len(), 3);
        assert_eq!(library.books_by_genre("Science Fiction").len(), 2);
        assert!(library.books_by_genre("Horror").is_empty());
    }

    #[test]
    fn test_most_rated() {
        let library = sample();
        assert_eq!(
            titles(&library.most_rated(3)),
            [
                "The Caves of Steel",
                "Harry Potter and the Philosopher's Stone",
                "A Game of Thrones"
            ]
        );
    }

    #[test]
    fn test_highly_rated_is_strict() {
        let mut library = sample();
        let asimov = library.find_author_by_name("Isaac Asimov").unwrap().id.clone();
        let reader = library.find_member_by_name("Alice Johnson").unwrap().id.clone();
        library.add_book(
            Book::new("I, Robot", "Science Fiction", 1950, asimov)
                .with_rating(Rating::new(reader, 4, None).unwrap()),
        );
        library.add_book(Book::new("Unrated", "Fantasy", 2020, EntityId::from("nobody")));

        let rated = library.highly_rated(4.0);
        assert_eq!(rated.len(), 5);
        assert!(rated.iter().all(|b| b.title != "I, Robot" && b.title != "Unrated"));
    }

    #[test]
    fn test_authors_and_members() {
        let library = sample();
        let fantasy: Vec<_> = library
            .authors_of_genre("Fantasy")
            .iter()
            .map(|a| a.name.clone())
            .collect();
        assert_eq!(fantasy, ["J.K. Rowling", "George R.R. Martin"]);

        let recent = library.members_joined_since(date(2024, 3, 1));
        assert_eq!(recent.len(), 2);
    }

    #[test]
    fn test_add_rating_emits_change() {
        let mut library = sample();
        let dune = library.add_book(Book::new(
            "Dune",
            "Science Fiction",
            1965,
            EntityId::from("herbert"),
        ));
        library.sink_mut().drain();

        let alice = library.find_member_by_name("Alice Johnson").unwrap().id.clone();
        library
            .add_rating(&dune, Rating::new(alice, 5, Some("Masterpiece of sci-fi!")).unwrap())
            .unwrap();

        let events = library.catalog().sink().events();
        assert!(events.iter().any(|e| matches!(
            e,
            CatalogEvent::Changed { change: Change::Stock { old: 0, new: 1 }, .. }
        )));
        assert_eq!(library.book(&dune).unwrap().average_rating(), Some(5.0));
    }

    #[test]
    fn test_missing_book_and_member() {
        let mut library = sample();
        let ghost = EntityId::from("ghost");
        assert!(library.set_publication_year(&ghost, 2000).unwrap_err().is_not_found());
        assert!(!library.remove_member(&ghost));

        let bob = library.find_member_by_name("Bob Smith").unwrap().id.clone();
        assert!(library.remove_member(&bob));
        assert_eq!(library.members().count(), 2);
    }
}
