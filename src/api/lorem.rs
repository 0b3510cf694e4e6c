//! Filler text for generated messages: sentences of 4-16 words,
//! paragraphs of 4-8 sentences.

use rand::Rng;
use rand::seq::IndexedRandom;

const WORDS: &[&str] = &[
    "lorem",
    "ipsum",
    "dolor",
    "sit",
    "amet",
    "consectetur",
    "adipiscing",
    "elit",
    "sed",
    "do",
    "eiusmod",
    "tempor",
    "incididunt",
    "ut",
    "labore",
    "et",
    "dolore",
    "magna",
    "aliqua",
    "enim",
    "ad",
    "minim",
    "veniam",
    "quis",
    "nostrud",
    "exercitation",
    "ullamco",
    "laboris",
    "nisi",
    "aliquip",
    "ex",
    "ea",
    "commodo",
    "consequat",
    "duis",
    "aute",
    "irure",
    "in",
    "reprehenderit",
    "voluptate",
    "velit",
    "esse",
    "cillum",
    "fugiat",
    "nulla",
    "pariatur",
    "excepteur",
    "sint",
    "occaecat",
    "cupidatat",
    "non",
    "proident",
    "sunt",
    "culpa",
    "qui",
    "officia",
    "deserunt",
    "mollit",
    "anim",
    "id",
    "est",
    "laborum",
];

const MIN_WORDS_PER_SENTENCE: usize = 4;
const MAX_WORDS_PER_SENTENCE: usize = 16;
const MIN_SENTENCES_PER_PARAGRAPH: usize = 4;
const MAX_SENTENCES_PER_PARAGRAPH: usize = 8;

fn pick(rng: &mut impl Rng) -> &'static str {
    // WORDS is non-empty, so choose cannot return None
    WORDS.choose(rng).copied().unwrap_or("lorem")
}

/// `n` lowercase words separated by single spaces.
pub fn words(n: usize) -> String {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| pick(&mut rng))
        .collect::<Vec<_>>()
        .join(" ")
}

fn sentence(rng: &mut impl Rng) -> String {
    let count = rng.random_range(MIN_WORDS_PER_SENTENCE..=MAX_WORDS_PER_SENTENCE);
    let mut out = String::new();
    for i in 0..count {
        let word = pick(rng);
        if i == 0 {
            let mut chars = word.chars();
            if let Some(first) = chars.next() {
                out.push(first.to_ascii_uppercase());
                out.push_str(chars.as_str());
            }
        } else {
            out.push(' ');
            out.push_str(word);
        }
    }
    out.push('.');
    out
}

fn paragraph(rng: &mut impl Rng) -> String {
    let count = rng.random_range(MIN_SENTENCES_PER_PARAGRAPH..=MAX_SENTENCES_PER_PARAGRAPH);
    (0..count)
        .map(|_| sentence(rng))
        .collect::<Vec<_>>()
        .join(" ")
}

/// `n` paragraphs separated by blank lines.
pub fn paragraphs(n: usize) -> String {
    let mut rng = rand::rng();
    (0..n)
        .map(|_| paragraph(&mut rng))
        .collect::<Vec<_>>()
        .join("\n\n")
}
