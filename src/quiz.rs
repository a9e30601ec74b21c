//! Multiple-choice question generation.
//!
//! A question asks which passage a well-known citation refers to. The correct
//! option is fetched live; the three wrong options come from a fixed pool of
//! famous verses.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, info, instrument, warn};

use crate::config::Translation;
use crate::core::{HttpTransport, VerseFetcher};

pub const OPTION_COUNT: usize = 4;
pub const DECOY_COUNT: usize = OPTION_COUNT - 1;

/// A citation the quiz can ask about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRef {
    pub book: &'static str,
    pub chapter: u32,
    pub verse: u32,
    pub prompt: &'static str,
}

impl VerseRef {
    const fn new(book: &'static str, chapter: u32, verse: u32, prompt: &'static str) -> Self {
        Self {
            book,
            chapter,
            verse,
            prompt,
        }
    }
}

pub const VERSE_CATALOG: [VerseRef; 10] = [
    VerseRef::new("Juan", 3, 16, "¿Qué dice Juan 3:16?"),
    VerseRef::new("Génesis", 1, 1, "¿Qué dice Génesis 1:1?"),
    VerseRef::new("Salmos", 23, 1, "¿Qué dice Salmos 23:1?"),
    VerseRef::new("Mateo", 5, 3, "¿Qué dice Mateo 5:3?"),
    VerseRef::new("Romanos", 8, 28, "¿Qué dice Romanos 8:28?"),
    VerseRef::new("1 Corintios", 13, 4, "¿Qué dice 1 Corintios 13:4?"),
    VerseRef::new("Filipenses", 4, 13, "¿Qué dice Filipenses 4:13?"),
    VerseRef::new("Proverbios", 3, 5, "¿Qué dice Proverbios 3:5?"),
    VerseRef::new("Isaías", 40, 31, "¿Qué dice Isaías 40:31?"),
    VerseRef::new("Jeremías", 29, 11, "¿Qué dice Jeremías 29:11?"),
];

/// Wrong-answer pool (RV1960 text of the catalog verses).
pub const DECOY_POOL: [&str; 10] = [
    "Porque de tal manera amó Dios al mundo, que ha dado a su Hijo unigénito, para que todo aquel que en él cree, no se pierda, mas tenga vida eterna.",
    "En el principio creó Dios los cielos y la tierra.",
    "Jehová es mi pastor; nada me faltará.",
    "Bienaventurados los pobres en espíritu, porque de ellos es el reino de los cielos.",
    "Y sabemos que a los que aman a Dios, todas las cosas les ayudan a bien, esto es, a los que conforme a su propósito son llamados.",
    "El amor es sufrido, es benigno; el amor no tiene envidia, el amor no es jactancioso, no se envanece;",
    "Todo lo puedo en Cristo que me fortalece.",
    "Fíate de Jehová de todo tu corazón, y no te apoyes en tu propia prudencia.",
    "Pero los que esperan a Jehová tendrán nuevas fuerzas; levantarán alas como las águilas; correrán, y no se cansarán; caminarán, y no se fatigarán.",
    "Porque yo sé los pensamientos que tengo acerca de vosotros, dice Jehová, pensamientos de paz, y no de mal, para daros el fin que esperáis.",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuestionKind {
    #[default]
    Verse,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::Verse => write!(f, "Verse"),
        }
    }
}

/// Cosmetic label; has no effect on decoys or scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "Easy"),
            Difficulty::Medium => write!(f, "Medium"),
            Difficulty::Hard => write!(f, "Hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    pub reference: String,
    pub version: Translation,
    pub kind: QuestionKind,
    pub difficulty: Difficulty,
    pub explanation: String,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }

    /// Option by 1-based index, as typed by the user.
    pub fn option(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.options.get(i))
            .map(String::as_str)
    }
}

/// Up to three distinct decoys from `DECOY_POOL`, never equal to `correct`.
pub fn pick_decoys<R: Rng + ?Sized>(correct: &str, rng: &mut R) -> Vec<String> {
    let candidates: Vec<&str> = DECOY_POOL
        .iter()
        .copied()
        .filter(|decoy| *decoy != correct)
        .collect();

    candidates
        .choose_multiple(rng, DECOY_COUNT)
        .map(|decoy| decoy.to_string())
        .collect()
}

/// Assemble a question around an already fetched verse text.
pub fn assemble_question<R: Rng + ?Sized>(
    verse_ref: &VerseRef,
    text: String,
    reference: String,
    translation: Translation,
    kind: QuestionKind,
    rng: &mut R,
) -> Question {
    let mut options = Vec::with_capacity(OPTION_COUNT);
    options.push(text.clone());
    options.extend(pick_decoys(&text, rng));
    options.shuffle(rng);

    let explanation = format!(
        "Este es el versículo completo de {} en la versión {}.",
        reference,
        translation.display_name()
    );

    Question {
        prompt: verse_ref.prompt.to_string(),
        options,
        correct_answer: text,
        reference,
        version: translation,
        kind,
        difficulty: Difficulty::random(rng),
        explanation,
    }
}

/// Builds questions by fetching a random catalog verse.
#[derive(Debug, Clone)]
pub struct QuestionBuilder<T: HttpTransport> {
    fetcher: VerseFetcher<T>,
}

impl<T: HttpTransport> QuestionBuilder<T> {
    pub fn new(fetcher: VerseFetcher<T>) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &VerseFetcher<T> {
        &self.fetcher
    }

    /// Build a question for a random catalog entry. `None` means the verse
    /// could not be fetched and the caller should offer a retry.
    pub async fn build<R: Rng + ?Sized>(
        &self,
        kind: QuestionKind,
        translation: Translation,
        rng: &mut R,
    ) -> Option<Question> {
        let verse_ref = VERSE_CATALOG[rng.gen_range(0..VERSE_CATALOG.len())];
        self.build_for(&verse_ref, kind, translation, rng).await
    }

    /// Build a question for a specific citation.
    #[instrument(skip(self, rng), fields(book = verse_ref.book, chapter = verse_ref.chapter, verse = verse_ref.verse))]
    pub async fn build_for<R: Rng + ?Sized>(
        &self,
        verse_ref: &VerseRef,
        kind: QuestionKind,
        translation: Translation,
        rng: &mut R,
    ) -> Option<Question> {
        let record = self
            .fetcher
            .fetch_verse(verse_ref.book, verse_ref.chapter, verse_ref.verse, translation)
            .await;

        if !record.success {
            warn!(error = ?record.error, "No question available");
            return None;
        }

        let question = assemble_question(verse_ref, record.text, record.reference, translation, kind, rng);
        debug!(options = question.options.len(), difficulty = %question.difficulty, "Assembled question");
        info!(reference = %question.reference, "Built new question");
        Some(question)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sorted(mut v: Vec<String>) -> Vec<String> {
        v.sort();
        v
    }

    #[test]
    fn test_decoys_exclude_correct_answer() {
        let mut rng = StdRng::seed_from_u64(7);
        for correct in DECOY_POOL {
            for _ in 0..20 {
                let decoys = pick_decoys(correct, &mut rng);
                assert_eq!(decoys.len(), DECOY_COUNT);
                assert!(decoys.iter().all(|d| d != correct));
                assert!(decoys.iter().all(|d| DECOY_POOL.contains(&d.as_str())));
            }
        }
    }

    #[test]
    fn test_decoys_are_distinct() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            let mut decoys = pick_decoys("texto que no está en la lista", &mut rng);
            decoys.sort();
            decoys.dedup();
            assert_eq!(decoys.len(), DECOY_COUNT);
        }
    }

    #[test]
    fn test_assembled_options_are_a_permutation() {
        let mut rng = StdRng::seed_from_u64(3);
        // Same seed, so the first draw matches the decoys chosen inside assemble_question
        let mut replay = rng.clone();
        let correct = "Porque de tal manera amó Dios al mundo...".to_string();
        let question = assemble_question(
            &VERSE_CATALOG[0],
            correct.clone(),
            "Juan 3:16".to_string(),
            Translation::Rv1960,
            QuestionKind::Verse,
            &mut rng,
        );

        assert_eq!(question.options.len(), OPTION_COUNT);
        assert_eq!(question.options.iter().filter(|o| **o == correct).count(), 1);

        let mut expected = vec![correct.clone()];
        expected.extend(pick_decoys(&correct, &mut replay));
        assert_eq!(sorted(question.options.clone()), sorted(expected));
        assert_eq!(question.correct_answer, correct);
        assert_eq!(question.prompt, "¿Qué dice Juan 3:16?");
        assert_eq!(
            question.explanation,
            "Este es el versículo completo de Juan 3:16 en la versión Reina-Valera 1960."
        );
    }

    #[test]
    fn test_shuffle_moves_correct_answer_around() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut positions = std::collections::HashSet::new();
        for _ in 0..100 {
            let q = assemble_question(
                &VERSE_CATALOG[1],
                "correct".to_string(),
                "Génesis 1:1".to_string(),
                Translation::Rv1960,
                QuestionKind::Verse,
                &mut rng,
            );
            positions.insert(q.options.iter().position(|o| o == "correct"));
        }
        assert_eq!(positions.len(), OPTION_COUNT);
    }

    #[test]
    fn test_option_lookup_is_one_based() {
        let mut rng = StdRng::seed_from_u64(1);
        let q = assemble_question(
            &VERSE_CATALOG[2],
            "x".to_string(),
            "Salmos 23:1".to_string(),
            Translation::Nvi,
            QuestionKind::Verse,
            &mut rng,
        );
        assert_eq!(q.option(1), Some(q.options[0].as_str()));
        assert_eq!(q.option(4), Some(q.options[3].as_str()));
        assert_eq!(q.option(0), None);
        assert_eq!(q.option(5), None);
    }

    #[test]
    fn test_catalog_prompts_match_citations() {
        for entry in VERSE_CATALOG {
            let expected = format!("¿Qué dice {} {}:{}?", entry.book, entry.chapter, entry.verse);
            assert_eq!(entry.prompt, expected);
        }
    }
}
