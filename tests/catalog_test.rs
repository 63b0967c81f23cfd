//! Behavior of the in-memory catalog: add, remove, search, list and stats.

use personal_library_manager::{Book, Catalog, RemoveOutcome, SearchField};
use pretty_assertions::assert_eq;

fn book(title: &str, author: &str, read: bool) -> Book {
    Book::new(title, author, 1990, "Fiction", read).unwrap()
}

fn sample() -> Catalog {
    Catalog::from_books(vec![
        book("Pride and Prejudice", "Jane Austen", true),
        book("Dune", "Frank Herbert", false),
        book("Emma", "Jane Austen", false),
        book("dune", "Brian Herbert", true),
    ])
}

#[test]
fn add_appends_at_the_end() {
    let mut catalog = sample();
    let before = catalog.list_all().to_vec();
    let new_book = book("Middlemarch", "George Eliot", false);

    catalog.add(new_book.clone());

    let mut expected = before;
    expected.push(new_book);
    assert_eq!(catalog.list_all(), expected.as_slice());
}

#[test]
fn add_allows_duplicate_titles() {
    let mut catalog = Catalog::new();
    catalog.add(book("Dune", "Frank Herbert", false));
    catalog.add(book("Dune", "Frank Herbert", false));
    assert_eq!(catalog.len(), 2);
}

#[test]
fn remove_matches_whole_title_ignoring_case() {
    let mut catalog = sample();

    assert_eq!(catalog.remove("DUNE"), RemoveOutcome::Removed(2));

    let titles: Vec<&str> = catalog.list_all().iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Pride and Prejudice", "Emma"]);
}

#[test]
fn remove_does_not_match_substrings() {
    let mut catalog = sample();
    let before = catalog.clone();

    assert_eq!(catalog.remove("Pride"), RemoveOutcome::NotFound);
    assert_eq!(catalog.remove("Pride").count(), 0);
    assert_eq!(catalog, before);
}

#[test]
fn search_by_title_is_case_insensitive_substring() {
    let catalog = sample();
    let results = catalog.search(SearchField::Title, "UN");
    let authors: Vec<&str> = results.iter().map(|b| b.author.as_str()).collect();
    assert_eq!(authors, vec!["Frank Herbert", "Brian Herbert"]);
}

#[test]
fn search_by_author_keeps_catalog_order() {
    let catalog = sample();
    let results = catalog.search(SearchField::Author, "austen");
    let titles: Vec<&str> = results.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(titles, vec!["Pride and Prejudice", "Emma"]);
}

#[test]
fn search_without_matches_is_empty() {
    assert!(sample().search(SearchField::Author, "Tolstoy").is_empty());
    assert!(Catalog::new().search(SearchField::Title, "anything").is_empty());
}

#[test]
fn stats_on_empty_catalog() {
    let stats = Catalog::new().stats();
    assert_eq!(stats.total, 0);
    assert_eq!(stats.read, 0);
    assert_eq!(stats.percent_read, 0.0);
    assert_eq!(stats.percent_label(), "0.0");
}

#[test]
fn stats_with_one_of_four_read() {
    let catalog = Catalog::from_books(vec![
        book("A", "x", true),
        book("B", "x", false),
        book("C", "x", false),
        book("D", "x", false),
    ]);
    let stats = catalog.stats();
    assert_eq!(stats.total, 4);
    assert_eq!(stats.read, 1);
    assert_eq!(stats.percent_read, 25.0);
    assert_eq!(stats.percent_label(), "25.0");
}
