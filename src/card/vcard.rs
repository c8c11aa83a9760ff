//! vCard 3.0 export.

use super::Card;

fn escape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.trim().chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ',' => out.push_str("\\,"),
            ';' => out.push_str("\\;"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Renders `card` as a vCard. Empty optional fields are left out.
pub fn to_vcard(card: &Card) -> String {
    let first = escape(&card.first_name);
    let last = escape(&card.last_name);

    let mut lines = vec![
        "BEGIN:VCARD".to_string(),
        "VERSION:3.0".to_string(),
        format!("FN:{}", format!("{first} {last}").trim()),
        format!("N:{last};{first};;;"),
    ];

    let optional = [
        ("ORG", &card.company),
        ("TITLE", &card.title),
        ("EMAIL", &card.email),
        ("TEL;TYPE=CELL", &card.mobile),
        ("TEL;TYPE=WORK", &card.office),
        ("URL", &card.website),
        ("NOTE", &card.note),
    ];
    for (key, value) in optional {
        if !value.trim().is_empty() {
            lines.push(format!("{key}:{}", escape(value)));
        }
    }

    lines.push("END:VCARD".to_string());
    lines.join("\r\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_card() {
        let card = Card {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            company: "Acme, Inc.".into(),
            title: "CTO".into(),
            email: "jane@acme.test".into(),
            mobile: "+1 555 010 0199".into(),
            website: "https://acme.test".into(),
            note: "Line one\nLine two".into(),
            ..Card::default()
        };
        let expected = [
            "BEGIN:VCARD",
            "VERSION:3.0",
            "FN:Jane Doe",
            "N:Doe;Jane;;;",
            "ORG:Acme\\, Inc.",
            "TITLE:CTO",
            "EMAIL:jane@acme.test",
            "TEL;TYPE=CELL:+1 555 010 0199",
            "URL:https://acme.test",
            "NOTE:Line one\\nLine two",
            "END:VCARD",
        ]
        .join("\r\n");
        assert_eq!(to_vcard(&card), expected);
    }

    #[test]
    fn empty_fields_are_skipped() {
        let card = Card {
            first_name: "Jane".into(),
            ..Card::default()
        };
        assert_eq!(
            to_vcard(&card),
            "BEGIN:VCARD\r\nVERSION:3.0\r\nFN:Jane\r\nN:;Jane;;;\r\nEND:VCARD"
        );
    }
}
