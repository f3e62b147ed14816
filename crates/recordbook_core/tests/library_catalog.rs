use recordbook_core::{InMemoryCollection, LibraryService, LibraryServiceError};

fn city_library() -> LibraryService<InMemoryCollection> {
    let mut library = LibraryService::new("City Library", InMemoryCollection::new());
    library
        .add_book("Python Basics", "John Doe", "123456")
        .unwrap();
    library
        .add_book("Advanced Python", "Jane Smith", "789012")
        .unwrap();
    library
}

#[test]
fn list_books_renders_status() {
    let library = city_library();
    assert_eq!(library.name(), "City Library");

    let rendered: Vec<_> = library
        .list_books()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(
        rendered,
        vec![
            "'Python Basics' by John Doe - Available",
            "'Advanced Python' by Jane Smith - Available",
        ]
    );
}

#[test]
fn borrow_and_return_cycle() {
    let mut library = city_library();

    let borrowed = library.borrow_book("python basics").unwrap();
    assert!(borrowed.is_borrowed);
    assert_eq!(borrowed.title, "Python Basics");
    assert_eq!(library.available_books().unwrap().len(), 1);

    assert_eq!(
        library.borrow_book("Python Basics").unwrap_err(),
        LibraryServiceError::AlreadyBorrowed("Python Basics".to_string())
    );

    let returned = library.return_book("PYTHON BASICS").unwrap();
    assert!(!returned.is_borrowed);
    assert_eq!(
        library.return_book("Python Basics").unwrap_err(),
        LibraryServiceError::NotBorrowed("Python Basics".to_string())
    );
    assert_eq!(library.available_books().unwrap().len(), 2);
}

#[test]
fn unknown_title_is_not_found() {
    let mut library = city_library();

    assert!(library.find_book("Rust in Action").unwrap().is_none());
    assert_eq!(
        library.borrow_book("Rust in Action").unwrap_err(),
        LibraryServiceError::BookNotFound("Rust in Action".to_string())
    );
    assert_eq!(
        library.return_book("Rust in Action").unwrap_err(),
        LibraryServiceError::BookNotFound("Rust in Action".to_string())
    );
}

#[test]
fn add_book_rejects_blank_title_or_author() {
    let mut library = city_library();

    assert_eq!(
        library.add_book("", "Someone", "1").unwrap_err(),
        LibraryServiceError::EmptyTitle
    );
    assert_eq!(
        library.add_book("Title", "  ", "1").unwrap_err(),
        LibraryServiceError::EmptyAuthor
    );
    assert_eq!(library.list_books().unwrap().len(), 2);
}

#[test]
fn find_book_keeps_isbn() {
    let library = city_library();
    let book = library.find_book("Advanced Python").unwrap().unwrap();
    assert_eq!(book.id, 2);
    assert_eq!(book.author, "Jane Smith");
    assert_eq!(book.isbn, "789012");
    assert_eq!(book.status(), "Available");
}
