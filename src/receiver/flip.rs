use std::collections::HashMap;
use std::sync::LazyLock;

/// The table being flipped, rendered right side up.
pub const TABLE: &str = "┻━┻";

/// Prefix placed in front of every flipped message.
pub const THROWER: &str = "   (╯°□°）╯ ";

static FLIPS: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    [
        ('a', "ɐ"),
        ('b', "q"),
        ('c', "ɔ"),
        ('d', "p"),
        ('e', "ǝ"),
        ('f', "ɟ"),
        ('g', "ƃ"),
        ('h', "ɥ"),
        ('i', "ᴉ"),
        ('j', "ɾ"),
        ('k', "ʞ"),
        ('l', "l"),
        ('m', "ɯ"),
        ('n', "u"),
        ('o', "o"),
        ('p', "d"),
        ('q', "b"),
        ('r', "ɹ"),
        ('s', "s"),
        ('t', "ʇ"),
        ('u', "n"),
        ('v', "ʌ"),
        ('w', "ʍ"),
        ('x', "x"),
        ('y', "ʎ"),
        ('z', "z"),
        ('A', "∀"),
        ('B', "B"),
        ('C', "Ɔ"),
        ('D', "D"),
        ('E', "Ǝ"),
        ('F', "Ⅎ"),
        ('G', "פ"),
        ('H', "H"),
        ('I', "I"),
        ('J', "ſ"),
        ('K', "K"),
        ('L', "˥"),
        ('M', "W"),
        ('N', "N"),
        ('O', "O"),
        ('P', "Ԁ"),
        ('Q', "Q"),
        ('R', "R"),
        ('S', "S"),
        ('T', "┴"),
        ('U', "∩"),
        ('V', "Λ"),
        ('W', "M"),
        ('X', "X"),
        ('Y', "⅄"),
        ('Z', "z"),
        ('0', "0"),
        ('1', "Ɩ"),
        ('2', "ᄅ"),
        ('3', "Ɛ"),
        ('4', "ㄣ"),
        ('5', "ϛ"),
        ('6', "9"),
        ('7', "ㄥ"),
        ('8', "8"),
        ('9', "6"),
        (',', "'"),
        ('.', "˙"),
        ('?', "¿"),
        ('!', "¡"),
        ('"', ",,"),
        ('\'', ","),
        ('`', ","),
        ('(', ")"),
        (')', "("),
        ('[', "]"),
        (']', "["),
        ('{', "}"),
        ('}', "{"),
        ('<', ">"),
        ('>', "<"),
        ('&', "⅋"),
        ('_', "‾"),
    ]
    .into_iter()
    .collect()
});

/// Replaces every character that has an upside-down counterpart, keeping the original order.
pub fn substitute(input: &str) -> String {
    let mut flipped = String::with_capacity(input.len());
    for c in input.chars() {
        match FLIPS.get(&c) {
            Some(glyph) => flipped.push_str(glyph),
            None => flipped.push(c),
        }
    }
    flipped
}

/// Reverses by code point, not by byte.
pub fn reverse(input: &str) -> String {
    input.chars().rev().collect()
}

/// Trims surrounding spaces and removes the first occurrence of the trigger word.
pub fn strip_trigger(text: &str, trigger_word: &str) -> String {
    text.trim_matches(' ').replacen(trigger_word, "", 1)
}

/// Flips the command text, table included: `"hello"` becomes `"ollǝɥ ┻━┻"`.
pub fn flip(text: &str, trigger_word: &str) -> String {
    let remainder = strip_trigger(text, trigger_word);
    reverse(&format!("{} {}", TABLE, substitute(&remainder)))
}

/// Full message text as posted back to the channel.
pub fn render(text: &str, trigger_word: &str) -> String {
    format!("{}{}", THROWER, flip(text, trigger_word))
}
