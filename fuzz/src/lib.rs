use arbitrary::Arbitrary;
use gettext_po::{Entry, TranslationTable};

/// Wrapper struct for generating arbitrary catalog entries.
#[derive(Arbitrary, Debug)]
pub struct FuzzEntry {
    pub msgctxt: Option<String>,
    pub msgid: String,
    pub msgstr: String,
    /// `msgid_plural` and the plural translations.
    pub plural: Option<(String, Vec<String>)>,
}

/// Generate a random TranslationTable for fuzzing.
///
/// Entries are written the way the parser would produce them: an empty
/// context is no context, and an empty `msgid_plural` is a singular
/// entry. The header entry is left out.
pub fn create_table(entries: Vec<FuzzEntry>) -> TranslationTable {
    let mut table = TranslationTable::new("utf-8");
    for FuzzEntry {
        msgctxt,
        msgid,
        msgstr,
        plural,
    } in entries
    {
        let msgctxt = msgctxt.filter(|msgctxt| !msgctxt.is_empty());
        if msgctxt.is_none() && msgid.is_empty() {
            continue;
        }
        let mut entry = match plural {
            Some((msgid_plural, msgstr)) if !msgid_plural.is_empty() => {
                Entry::plural(msgid, msgid_plural, msgstr)
            }
            _ => Entry::singular(msgid, msgstr),
        };
        entry.msgctxt = msgctxt;
        table.insert(entry);
    }
    table
}

/// Split `data` at the given offsets, taken modulo the length of the
/// remaining data.
pub fn split_chunks<'a>(mut data: &'a [u8], splits: &[usize]) -> Vec<&'a [u8]> {
    let mut chunks = Vec::new();
    for split in splits {
        if data.is_empty() {
            break;
        }
        let (chunk, rest) = data.split_at(split % (data.len() + 1));
        chunks.push(chunk);
        data = rest;
    }
    chunks.push(data);
    chunks
}
