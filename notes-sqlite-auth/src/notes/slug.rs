//! Title to slug derivation.
//!
//! Titles are lowercased and runs of whitespace and hyphens collapse to a
//! single `-` before anything is dropped, so a symbol between two spaces
//! leaves `--` behind. Cyrillic letters are then transliterated to Latin and
//! everything else outside `[a-z0-9-]` disappears. Edge hyphens stay.

pub const MAX_SLUG_LENGTH: usize = 100;

fn transliterate(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' => "g",
        'д' => "d",
        'е' => "e",
        'ё' => "yo",
        'ж' => "zh",
        'з' => "z",
        'и' => "i",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "y",
        'э' => "e",
        'ю' => "yu",
        'я' => "ya",
        // ukrainian
        'є' => "ye",
        'і' => "i",
        'ї' => "yi",
        'ґ' => "g",
        _ => return None,
    };
    Some(latin)
}

pub fn slugify(title: &str) -> String {
    let title = title.to_lowercase().replace("&amp;", " and ").replace('&', " and ");

    let mut slug = String::with_capacity(title.len());
    let mut in_separator = false;
    for c in title.chars() {
        if c.is_whitespace() || c == '-' {
            if !in_separator {
                slug.push('-');
            }
            in_separator = true;
            continue;
        }
        in_separator = false;

        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        } else if let Some(latin) = transliterate(c) {
            slug.push_str(latin);
        }
    }

    truncate(&slug)
}

fn truncate(slug: &str) -> String {
    match slug.char_indices().nth(MAX_SLUG_LENGTH) {
        Some((index, _)) => slug[..index].to_string(),
        None => slug.to_string(),
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latin_titles() {
        assert_eq!(slugify("Title"), "title");
        assert_eq!(slugify("Hello  World"), "hello-world");
        assert_eq!(slugify("Rock & Roll -- 2024!"), "rock-and-roll-2024");
    }

    #[test]
    fn cyrillic_titles() {
        assert_eq!(slugify("Заголовок"), "zagolovok");
        assert_eq!(slugify("Тестовая заметка"), "testovaya-zametka");
        assert_eq!(slugify("Щука и ёж"), "schuka-i-yozh");
        assert_eq!(slugify("Объявление"), "obyavlenie");
    }

    #[test]
    fn separators_collapse_before_symbols_are_dropped() {
        assert_eq!(slugify("Итоги 2024 — план"), "itogi-2024--plan");
        assert_eq!(slugify("- a -"), "-a-");
        assert_eq!(slugify("  Rock & Roll "), "-rock-and-roll-");
    }

    #[test]
    fn nothing_left() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語"), "");
    }

    #[test]
    fn long_titles_are_cut() {
        let slug = slugify(&"a ".repeat(200));
        assert_eq!(slug.len(), MAX_SLUG_LENGTH);
        assert!(is_valid_slug(&slug));

        let slug = slugify(&"ж".repeat(80));
        assert_eq!(slug.chars().count(), MAX_SLUG_LENGTH);
    }

    #[test]
    fn slug_alphabet() {
        assert!(is_valid_slug("my_note-2"));
        assert!(!is_valid_slug("my note"));
        assert!(!is_valid_slug("заметка"));
        assert!(!is_valid_slug(""));
    }
}
