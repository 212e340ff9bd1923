//! Sound-it-out help: split a word into speakable chunks.

/// Letter groups and how they are spoken. Longer groups win.
const SOUNDS: &[(&str, &str)] = &[
    ("igh", "eye"),
    ("ing", "ing"),
    ("ch", "ch"),
    ("sh", "shhh"),
    ("th", "th"),
    ("ph", "f"),
    ("wh", "w"),
    ("ck", "k"),
    ("qu", "kw"),
    ("ai", "ay"),
    ("ay", "ay"),
    ("ee", "e"),
    ("ea", "e"),
    ("oa", "oh"),
    ("oe", "oh"),
    ("oi", "oy"),
    ("oy", "oy"),
    ("ou", "ow"),
    ("ow", "ow"),
    ("au", "aw"),
    ("aw", "aw"),
    ("oo", "oo"),
    ("ar", "ar"),
    ("er", "er"),
    ("ir", "er"),
    ("or", "or"),
    ("ur", "er"),
];

fn lookup(group: &str) -> Option<&'static str> {
    SOUNDS
        .iter()
        .find(|(letters, _)| *letters == group)
        .map(|(_, sound)| *sound)
}

/// Greedy left-to-right chunking: at each position try three letters, then
/// two, then fall back to the single letter.
pub fn phonetic_chunks(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.trim().to_lowercase().chars().collect();
    let mut chunks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let matched = [3, 2].into_iter().find_map(|len| {
            let group: String = chars.get(i..i + len)?.iter().collect();
            lookup(&group).map(|sound| (len, sound))
        });
        match matched {
            Some((len, sound)) => {
                chunks.push(sound.to_string());
                i += len;
            }
            None => {
                chunks.push(chars[i].to_string());
                i += 1;
            }
        }
    }
    chunks
}
