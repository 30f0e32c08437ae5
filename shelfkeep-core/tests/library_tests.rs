//! Integration tests for the book library
//!
//! Replays the book CRUD and query walkthroughs against the sample data.

use chrono::NaiveDate;
use shelfkeep_core::{Book, CatalogEvent, Library, Member, Rating, RecordingSink};

fn sample() -> Library<RecordingSink> {
    Library::sample_with_default_sink()
}

#[test]
fn test_sample_shape() {
    let library = sample();
    assert_eq!(library.authors().count(), 3);
    assert_eq!(library.members().count(), 3);
    assert_eq!(library.books().count(), 5);
    assert_eq!(library.catalog().len(), 5);
}

#[test]
fn test_crud_walkthrough() {
    let mut library = sample();

    let david = library.add_member(Member::new(
        "David Wilson",
        "david@example.com",
        NaiveDate::from_ymd_opt(2026, 1, 2).unwrap(),
    ));
    assert!(library.members().any(|m| m.id == david));

    let asimov = library.find_author_by_name("Isaac Asimov").unwrap().id.clone();
    let dune = library.add_book(Book::new("Dune", "Science Fiction", 1965, asimov));

    let sci_fi: Vec<_> = library
        .books_by_genre("Science Fiction")
        .iter()
        .map(|b| b.title.clone())
        .collect();
    assert_eq!(sci_fi, ["Foundation", "The Caves of Steel", "Dune"]);

    let updated = library.set_publication_year(&dune, 1966).unwrap();
    assert_eq!(updated.publication_year, 1966);

    let bob = library.find_member_by_name("Bob Smith").unwrap().id.clone();
    assert!(library.remove_member(&bob));
    assert!(library.find_member_by_name("Bob Smith").is_none());

    let first = library.members().next().unwrap().id.clone();
    library
        .add_rating(&dune, Rating::new(first, 5, Some("Masterpiece of sci-fi!")).unwrap())
        .unwrap();
    assert_eq!(library.book(&dune).unwrap().rating_count(), 1);
    assert_eq!(library.catalog().get(&dune).unwrap().price(), 5.0);
}

#[test]
fn test_query_walkthrough() {
    let library = sample();

    assert!(library.books_published_after(2015).is_empty());
    assert_eq!(library.books_published_after(1996).len(), 2);

    let since = NaiveDate::from_ymd_opt(2024, 3, 20).unwrap();
    let names: Vec<_> = library
        .members_joined_since(since)
        .iter()
        .map(|m| m.name.clone())
        .collect();
    assert_eq!(names, ["Bob Smith", "Carol Davis"]);

    assert_eq!(library.highly_rated(4.0).len(), 5);
    assert_eq!(library.highly_rated(4.5).len(), 2);
}

#[test]
fn test_most_rated_top_three() {
    let library = sample();
    let top = library.most_rated(3);
    assert_eq!(top[0].title, "The Caves of Steel");
    assert_eq!(top[0].rating_count(), 3);
    assert!(top[1..].iter().all(|b| b.rating_count() == 2));
}

#[test]
fn test_rating_missing_book() {
    let mut library = sample();
    let ghost = shelfkeep_core::EntityId::from("missing");
    let rating = Rating::new(ghost.clone(), 3, None).unwrap();
    assert!(library.add_rating(&ghost, rating).unwrap_err().is_not_found());
    assert!(!library
        .catalog()
        .sink()
        .events()
        .iter()
        .any(|e| matches!(e, CatalogEvent::Changed { .. })));
}
