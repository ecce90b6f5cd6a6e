// bookstore/src/store/seed.rs

/// Demo catalog: category name, then `(title, author, price in cents)`.
pub const DEMO_CATALOG: &[(&str, &[(&str, &str, i32)])] = &[
  (
    "Fantasy",
    &[
      ("A Wizard of Earthsea", "Ursula K. Le Guin", 1499),
      ("The Hobbit", "J. R. R. Tolkien", 1899),
      ("The Name of the Wind", "Patrick Rothfuss", 2199),
    ],
  ),
  (
    "History",
    &[
      ("SPQR", "Mary Beard", 2450),
      ("The Guns of August", "Barbara W. Tuchman", 1995),
    ],
  ),
  (
    "Science Fiction",
    &[
      ("Dune", "Frank Herbert", 1999),
      ("Neuromancer", "William Gibson", 1650),
      ("The Left Hand of Darkness", "Ursula K. Le Guin", 1725),
    ],
  ),
];
