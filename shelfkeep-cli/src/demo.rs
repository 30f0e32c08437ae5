// Scripted walkthroughs over the sample data

use anyhow::{Context, Result};
use chrono::{Local, Months};
use shelfkeep_core::{
    seed::sample_products, Book, Catalog, EntityId, EventSink, Library, Member, ProductCategory,
    Rating,
};

use crate::sink::ConsoleSink;

/// Product manager walkthrough: seed, update, filter, rank, remove
pub fn products() -> Result<()> {
    println!("=== E-Commerce Product Management System ===\n");

    let mut catalog = Catalog::with_sink(ConsoleSink::verbose());
    catalog.extend_from(sample_products());
    print_all(&catalog);

    println!("\n--- Updating Product Price and Stock ---");
    catalog.update_price(&EntityId::Int(1), 549.99)?;
    catalog.update_stock(&EntityId::Int(2), 40)?;
    catalog.update_stock(&EntityId::Int(5), 15)?;
    print_all(&catalog);

    println!("\n--- Electronics Products ---");
    for entity in catalog.filter_by_category(ProductCategory::Electronics.as_str()) {
        println!("{}", entity.display_info());
    }

    println!("\n--- Low Stock Products (threshold: 10) ---");
    for entity in catalog.low_stock(10) {
        println!("{}", entity.display_info());
    }

    println!("\n--- Removing a Product ---");
    catalog.remove(&EntityId::Int(3));
    print_all(&catalog);

    // Failures here are reported by the sink and are expected
    println!("\n--- Error Handling ---");
    let missing = EntityId::Int(99);
    if catalog.update_price(&missing, 100.0).is_ok() {
        anyhow::bail!("update of a missing product unexpectedly succeeded");
    }
    catalog.remove(&missing);

    Ok(())
}

fn print_all<K: EventSink>(catalog: &Catalog<K>) {
    println!("\n--- All Products ---");
    if catalog.is_empty() {
        println!("No products available");
        return;
    }
    for entity in catalog.iter() {
        println!("{}", entity.display_info());
    }
}

/// Book walkthrough: setup, CRUD, queries, most-rated ranking
pub fn books(top: usize) -> Result<()> {
    let mut library = Library::with_sink(ConsoleSink::quiet());
    library_setup(&mut library);

    println!("\nSample Data Overview:");
    println!("Authors: {}", join(library.authors().map(|a| a.name.as_str())));
    println!("Members: {}", join(library.members().map(|m| m.name.as_str())));
    println!("Books: {}", join(library.books().map(|b| b.title.as_str())));

    crud(&mut library)?;
    queries(&library)?;

    println!("\nTop {} most-rated books:", top);
    for (rank, book) in library.most_rated(top).iter().enumerate() {
        let avg = book
            .average_rating()
            .map(|a| format!("{:.2}", a))
            .unwrap_or_else(|| "N/A".to_string());
        println!("   {}. {}", rank + 1, book.title);
        println!("      Ratings: {}, Average: {}", book.rating_count(), avg);
    }
    Ok(())
}

fn library_setup(library: &mut Library<ConsoleSink>) {
    library.seed_sample();
    println!(
        "Inserted {} authors, {} members, {} books",
        library.authors().count(),
        library.members().count(),
        library.books().count()
    );
}

fn crud(library: &mut Library<ConsoleSink>) -> Result<()> {
    println!("\n1. Inserting new member...");
    let today = Local::now().date_naive();
    library.add_member(Member::new("David Wilson", "david@example.com", today));
    println!(" New member created: David Wilson");

    println!("\n2. Inserting new book...");
    let asimov = library
        .find_author_by_name("Isaac Asimov")
        .context("sample author Isaac Asimov missing")?
        .id
        .clone();
    let dune = library.add_book(Book::new("Dune", "Science Fiction", 1965, asimov));
    println!(" New book created: Dune");

    println!("\n3. Science Fiction books:");
    for book in library.books_by_genre("Science Fiction") {
        println!("   - {} ({})", book.title, book.publication_year);
    }

    println!("\n4. Updating book publication year...");
    let updated = library.set_publication_year(&dune, 1966)?;
    println!(
        " Updated publication year for \"{}\" to {}",
        updated.title, updated.publication_year
    );

    println!("\n5. Deleting a member...");
    let bob = library
        .find_member_by_name("Bob Smith")
        .context("sample member Bob Smith missing")?
        .id
        .clone();
    library.remove_member(&bob);
    println!(" Deleted member: Bob Smith");

    println!("\n6. Adding new rating to a book...");
    let rater = library
        .members()
        .next()
        .context("no members left to rate with")?
        .id
        .clone();
    library.add_rating(&dune, Rating::new(rater, 5, Some("Masterpiece of sci-fi!"))?)?;
    println!(" Added rating to \"Dune\"");
    Ok(())
}

fn queries(library: &Library<ConsoleSink>) -> Result<()> {
    println!("\n1. Books published after 2015:");
    let recent = library.books_published_after(2015);
    if recent.is_empty() {
        println!("   No books found published after 2015");
    }
    for book in recent {
        println!("   - {} ({})", book.title, book.publication_year);
    }

    println!("\n2. Authors of Fantasy books:");
    for author in library.authors_of_genre("Fantasy") {
        println!("   - {}", author.name);
    }

    println!("\n3. Members who joined in last 6 months:");
    let since = Local::now()
        .date_naive()
        .checked_sub_months(Months::new(6))
        .context("date six months ago is out of range")?;
    for member in library.members_joined_since(since) {
        println!("   - {} (joined: {})", member.name, member.join_date);
    }

    println!("\n4. Books with average rating > 4:");
    for book in library.highly_rated(4.0) {
        let avg = book.average_rating().unwrap_or_default();
        println!("   - {} (Avg Rating: {:.2})", book.title, avg);
    }
    Ok(())
}

fn join<'a>(names: impl Iterator<Item = &'a str>) -> String {
    names.collect::<Vec<_>>().join(", ")
}
