//! Static fixtures used across harnesses.

use super::builders::MovieBuilder;
use reel_core::Movie;

/// Query strings covering every segment shape the parser distinguishes.
pub const QUERY_CORPUS: &[&str] = &[
    "",
    "heat",
    "heat 1995",
    "  the  godfather  ",
    "alien;genre=horror",
    "alien;genre=-horror;genre=thriller",
    "genre=horror;year=1979",
    "a=1=2",
    "x;;y",
    "mad max; director = miller ; =; bogus=a=b",
    "-romance;year=-1990",
];

/// Small, hand-picked search results.
pub fn sample_movies() -> Vec<Movie> {
    vec![
        MovieBuilder::new(949, "Heat").year(1995).similarity(0.93).build(),
        MovieBuilder::new(348, "Alien").year(1979).similarity(0.71).build(),
        MovieBuilder::new(11645, "Ran").year_text("1985").build(),
        MovieBuilder::new(77, "Untitled Project").build(),
    ]
}
