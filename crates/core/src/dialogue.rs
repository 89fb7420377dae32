//! Legacy webhook dialogue.
//!
//! A narrowing conversation over the condition table, driven turn by turn by an external
//! conversational platform. The platform parses the user's words into entities and hands back
//! whatever session parameters the previous turn returned; nothing is stored here.
//!
//! Each turn filters the table down to the records whose symptom slots contain *every*
//! identified symptom, then either asks about one candidate's remaining symptoms or concludes.
//! The transition is a pure function of `(session, mentioned symptoms, random source)`.
//!
//! ## Turn outcomes, in precedence order
//!
//! 1. nothing identified: ask the user to describe how they feel
//! 2. no candidate and fewer than five symptoms: ask for more detail
//! 3. a candidate exists:
//!    - nothing new to ask, or the user said yes: resolve to the candidate
//!    - the user said no: list every remaining candidate
//!    - five symptoms identified: resolve to the candidate
//!    - otherwise ask about the candidate's remaining symptoms
//! 4. no candidate and five or more symptoms: give up with a search suggestion

use crate::dataset::{ConditionRecord, ConditionTable};
use crate::search::search_url;
use crate::Symptom;
use rand::Rng;
use std::sync::Arc;

/// Number of identified symptoms at which the dialogue stops asking.
pub const MAX_IDENTIFIED: usize = 5;

pub const CLARIFY_MESSAGE: &str = "I am unable to understand your query. Tell me how you are feeling.";
const NEED_MORE_DETAIL_MESSAGE: &str = "I am not able to understand from your query. Could you please describe more symptoms on what you are feeling. (fever, headache)";
const BRANCH_PREFIX: &str = "In that case you may be experiencing one of these conditions:";
/// U+2029 PARAGRAPH SEPARATOR, rendered as a line break by the calling platform.
const PARAGRAPH_SEPARATOR: char = '\u{2029}';

/// The user's answer to the previous "are you also feeling" question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
    #[default]
    Absent,
}

impl YesNo {
    /// Interprets a parsed entity value; anything other than yes/no counts as absent.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "yes" => YesNo::Yes,
            "no" => YesNo::No,
            _ => YesNo::Absent,
        }
    }
}

/// Session parameters round-tripped through the calling platform.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueSession {
    /// Symptoms confirmed so far. Set semantics; kept in first-seen order.
    pub identified: Vec<Symptom>,
    /// Position of the candidate asked about last turn, within that turn's filtered subset.
    pub candidate_index: Option<usize>,
    /// Symptoms the last question asked about.
    ///
    /// Output only: `resolve` recomputes this from the chosen candidate and ignores the value
    /// passed in.
    pub pending_new_symptoms: Vec<Symptom>,
    pub last_yes_no: YesNo,
}

impl DialogueSession {
    fn reset() -> Self {
        Self::default()
    }
}

/// Which branch of the dialogue a turn took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueStep {
    Clarify,
    NeedMoreDetail,
    Resolved,
    Branched,
    Asking,
    Inconclusive,
}

/// Output of one turn: the text to speak and the session to hand back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueReply {
    pub step: DialogueStep,
    pub message: String,
    pub session: DialogueSession,
}

/// Source of the candidate chosen when the caller supplies no usable index.
pub trait CandidatePicker {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random picker over any `rand` generator.
pub struct RandomPicker<R: Rng>(pub R);

impl RandomPicker<rand::rngs::ThreadRng> {
    pub fn thread_local() -> Self {
        Self(rand::thread_rng())
    }
}

impl<R: Rng> CandidatePicker for RandomPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

/// Stateless resolver over the shared condition table.
#[derive(Clone, Debug)]
pub struct DialogueResolver {
    table: Arc<ConditionTable>,
}

impl DialogueResolver {
    pub fn new(table: Arc<ConditionTable>) -> Self {
        Self { table }
    }

    /// Runs one dialogue turn.
    ///
    /// `mentioned` holds the symptoms parsed from the user's latest utterance; they are merged
    /// into `session.identified`. `session.candidate_index` is only honoured when the user is
    /// answering a yes/no question, since it refers to the candidate that question was about.
    pub fn resolve<P>(
        &self,
        session: DialogueSession,
        mentioned: &[Symptom],
        picker: &mut P,
    ) -> DialogueReply
    where
        P: CandidatePicker + ?Sized,
    {
        let mut identified = session.identified;
        for symptom in mentioned {
            if !identified.contains(symptom) {
                identified.push(symptom.clone());
            }
        }

        if identified.is_empty() {
            return reset_reply(DialogueStep::Clarify, CLARIFY_MESSAGE.into());
        }

        let candidates: Vec<&ConditionRecord> = self
            .table
            .records()
            .iter()
            .filter(|record| identified.iter().all(|s| record.contains(s)))
            .collect();

        if candidates.is_empty() {
            if identified.len() < MAX_IDENTIFIED {
                return reset_reply(DialogueStep::NeedMoreDetail, NEED_MORE_DETAIL_MESSAGE.into());
            }
            let message = format!(
                "I am unable to come on any conclusion on this. Please visit \"{}\"",
                search_url(&identified, None)
            );
            return reset_reply(DialogueStep::Inconclusive, message);
        }

        let yes_no = session.last_yes_no;
        let index = match (yes_no, session.candidate_index) {
            (YesNo::Yes | YesNo::No, Some(i)) if i < candidates.len() => i,
            _ => picker.pick(candidates.len()),
        };
        let candidate = candidates[index];

        let new_symptoms: Vec<Symptom> = candidate
            .symptoms()
            .iter()
            .filter(|s| !identified.contains(s))
            .cloned()
            .collect();

        if new_symptoms.is_empty() || yes_no == YesNo::Yes {
            return reset_reply(DialogueStep::Resolved, resolution_message(candidate));
        }

        if yes_no == YesNo::No {
            let mut message = String::from(BRANCH_PREFIX);
            for record in &candidates {
                message.push(PARAGRAPH_SEPARATOR);
                message.push_str(&format!(
                    " | Condition - {} and treatment is {} ",
                    record.diagnosis(),
                    record.treatment()
                ));
            }
            return reset_reply(DialogueStep::Branched, message);
        }

        if identified.len() == MAX_IDENTIFIED {
            return reset_reply(DialogueStep::Resolved, resolution_message(candidate));
        }

        let question = new_symptoms
            .iter()
            .map(Symptom::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        DialogueReply {
            step: DialogueStep::Asking,
            message: format!("Are you also feeling {question}. (Yes/No)"),
            session: DialogueSession {
                identified,
                candidate_index: Some(index),
                pending_new_symptoms: new_symptoms,
                last_yes_no: YesNo::Absent,
            },
        }
    }
}

fn resolution_message(record: &ConditionRecord) -> String {
    format!(
        "Ok. As per my analysis you may be experiencing {}. Not to worry as the treatment of same is {}",
        record.diagnosis(),
        record.treatment()
    )
}

fn reset_reply(step: DialogueStep, message: String) -> DialogueReply {
    DialogueReply {
        step,
        message,
        session: DialogueSession::reset(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DatasetSource;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Always picks the same position.
    struct FixedPicker(usize);

    impl CandidatePicker for FixedPicker {
        fn pick(&mut self, _len: usize) -> usize {
            self.0
        }
    }

    /// Fails the test if the resolver needs a random pick.
    struct NoPick;

    impl CandidatePicker for NoPick {
        fn pick(&mut self, _len: usize) -> usize {
            panic!("resolver should not pick at random here")
        }
    }

    fn symptoms(list: &str) -> Vec<Symptom> {
        Symptom::parse_list(list)
    }

    fn fever_headache_table() -> Arc<ConditionTable> {
        Arc::new(ConditionTable::new(
            vec![
                ConditionRecord::new(
                    ["fever", "headache", "cough", "fatigue", ""],
                    "Common Cold",
                    "Rest and fluids",
                ),
                ConditionRecord::new(
                    ["fever", "headache", "stiff neck", "", ""],
                    "Meningitis",
                    "Seek emergency care",
                ),
                ConditionRecord::new(
                    ["headache", "fever", "rash", "joint pain", "nausea"],
                    "Dengue",
                    "Fluids and monitoring",
                ),
                ConditionRecord::new(
                    ["nausea", "vomiting", "", "", ""],
                    "Gastroenteritis",
                    "Hydration and rest",
                ),
            ],
            DatasetSource::BuiltIn,
        ))
    }

    fn session_with(identified: &str, index: Option<usize>, yes_no: YesNo) -> DialogueSession {
        DialogueSession {
            identified: symptoms(identified),
            candidate_index: index,
            pending_new_symptoms: Vec::new(),
            last_yes_no: yes_no,
        }
    }

    #[test]
    fn empty_input_resets_and_asks_to_clarify() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let mut session = session_with("", Some(2), YesNo::Yes);
        session.pending_new_symptoms = symptoms("rash");

        let reply = resolver.resolve(session, &[], &mut NoPick);

        assert_eq!(reply.step, DialogueStep::Clarify);
        assert_eq!(reply.message, CLARIFY_MESSAGE);
        assert_eq!(reply.session, DialogueSession::default());
    }

    #[test]
    fn asks_about_symptoms_not_yet_identified() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let identified = symptoms("fever, headache");

        for pick in 0..3 {
            let reply = resolver.resolve(
                DialogueSession::default(),
                &identified,
                &mut FixedPicker(pick),
            );

            assert_eq!(reply.step, DialogueStep::Asking);
            assert!(reply.message.starts_with("Are you also feeling "));
            assert_eq!(reply.session.identified, identified);
            assert_eq!(reply.session.candidate_index, Some(pick));

            let candidate = &resolver.table.records()[pick];
            assert!(!reply.session.pending_new_symptoms.is_empty());
            for asked in &reply.session.pending_new_symptoms {
                assert!(candidate.contains(asked));
                assert!(!identified.contains(asked));
            }
        }
    }

    #[test]
    fn random_pick_stays_within_candidates() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let mut picker = RandomPicker(StdRng::seed_from_u64(7));

        for _ in 0..20 {
            let reply = resolver.resolve(
                DialogueSession::default(),
                &symptoms("fever, headache"),
                &mut picker,
            );
            let index = reply.session.candidate_index.expect("index is carried");
            assert!(index < 3);
        }
    }

    #[test]
    fn yes_resolves_to_the_candidate_that_was_asked_about() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let session = session_with("fever, headache", Some(1), YesNo::Yes);

        let reply = resolver.resolve(session, &[], &mut NoPick);

        assert_eq!(reply.step, DialogueStep::Resolved);
        assert_eq!(
            reply.message,
            "Ok. As per my analysis you may be experiencing Meningitis. Not to worry as the treatment of same is Seek emergency care"
        );
        assert_eq!(reply.session, DialogueSession::default());
    }

    #[test]
    fn incoming_pending_symptoms_are_recomputed() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let mut session = session_with("fever, headache", Some(0), YesNo::Absent);
        session.pending_new_symptoms = symptoms("vomiting, rash");

        let reply = resolver.resolve(session, &[], &mut FixedPicker(0));

        assert_eq!(reply.step, DialogueStep::Asking);
        assert_eq!(reply.session.pending_new_symptoms, symptoms("cough, fatigue"));
    }

    #[test]
    fn no_lists_every_remaining_candidate() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let session = session_with("fever, headache", Some(0), YesNo::No);

        let reply = resolver.resolve(session, &[], &mut NoPick);

        assert_eq!(reply.step, DialogueStep::Branched);
        assert!(reply.message.starts_with(BRANCH_PREFIX));
        assert_eq!(reply.message.matches(PARAGRAPH_SEPARATOR).count(), 3);
        for name in ["Common Cold", "Meningitis", "Dengue"] {
            assert!(reply.message.contains(name));
        }
        assert!(!reply.message.contains("Gastroenteritis"));
        assert_eq!(reply.session, DialogueSession::default());
    }

    #[test]
    fn index_is_ignored_without_a_yes_no_answer() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let session = session_with("fever, headache", Some(1), YesNo::Absent);

        let reply = resolver.resolve(session, &[], &mut FixedPicker(2));

        assert_eq!(reply.session.candidate_index, Some(2));
    }

    #[test]
    fn out_of_range_index_falls_back_to_picker() {
        let resolver = DialogueResolver::new(fever_headache_table());
        let session = session_with("fever, headache", Some(9), YesNo::Yes);

        let reply = resolver.resolve(session, &[], &mut FixedPicker(0));

        assert_eq!(reply.step, DialogueStep::Resolved);
        assert!(reply.message.contains("Common Cold"));
    }

    #[test]
    fn single_candidate_with_nothing_left_resolves() {
        let resolver = DialogueResolver::new(fever_headache_table());

        let reply = resolver.resolve(
            DialogueSession::default(),
            &symptoms("stiff neck, fever, headache"),
            &mut FixedPicker(0),
        );

        assert_eq!(reply.step, DialogueStep::Resolved);
        assert!(reply.message.contains("Meningitis"));
    }

    #[test]
    fn five_identified_symptoms_always_resolve() {
        let resolver = DialogueResolver::new(fever_headache_table());
        for yes_no in [YesNo::Yes, YesNo::No, YesNo::Absent] {
            let session = session_with("headache, fever, rash, joint pain", Some(0), yes_no);
            let reply = resolver.resolve(session, &symptoms("nausea"), &mut FixedPicker(0));

            assert_eq!(reply.step, DialogueStep::Resolved, "yes/no = {yes_no:?}");
            assert!(reply.message.contains("Dengue"));
        }
    }

    #[test]
    fn no_candidate_with_few_symptoms_asks_for_detail() {
        let resolver = DialogueResolver::new(fever_headache_table());

        let reply = resolver.resolve(
            session_with("fever", None, YesNo::Absent),
            &symptoms("vomiting"),
            &mut NoPick,
        );

        assert_eq!(reply.step, DialogueStep::NeedMoreDetail);
        assert_eq!(reply.message, NEED_MORE_DETAIL_MESSAGE);
        assert!(reply.session.identified.is_empty());
    }

    #[test]
    fn no_candidate_with_five_symptoms_is_inconclusive() {
        let resolver = DialogueResolver::new(fever_headache_table());

        let reply = resolver.resolve(
            DialogueSession::default(),
            &symptoms("fever, headache, cough, rash, vomiting"),
            &mut NoPick,
        );

        assert_eq!(reply.step, DialogueStep::Inconclusive);
        assert!(reply
            .message
            .contains("https://www.google.com/search?q=fever+headache+cough+rash+vomiting"));
        assert_eq!(reply.session, DialogueSession::default());
    }

    #[test]
    fn mentioned_symptoms_merge_with_identified() {
        let resolver = DialogueResolver::new(fever_headache_table());

        let reply = resolver.resolve(
            session_with("fever", None, YesNo::Absent),
            &symptoms("Headache, fever"),
            &mut FixedPicker(0),
        );

        assert_eq!(reply.session.identified, symptoms("fever, headache"));
    }

    #[test]
    fn yes_no_parsing_is_lenient() {
        assert_eq!(YesNo::parse(" Yes "), YesNo::Yes);
        assert_eq!(YesNo::parse("NO"), YesNo::No);
        assert_eq!(YesNo::parse(""), YesNo::Absent);
        assert_eq!(YesNo::parse("maybe"), YesNo::Absent);
    }
}
