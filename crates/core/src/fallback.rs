//! Canned chat replies used when the AI provider is unavailable.
//!
//! Selection is a plain keyword test on the case-folded message, checked in a fixed priority
//! order. The first topic with any keyword present wins; otherwise the general script is used.

/// Topic of a canned reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTopic {
    Headache,
    Fever,
    Cough,
    Nausea,
    Pain,
    General,
}

/// Keyword sets in priority order.
const TOPIC_KEYWORDS: [(FallbackTopic, &[&str]); 5] = [
    (FallbackTopic::Headache, &["headache", "head pain"]),
    (FallbackTopic::Fever, &["fever", "temperature", "hot"]),
    (FallbackTopic::Cough, &["cough", "coughing"]),
    (
        FallbackTopic::Nausea,
        &["nausea", "vomiting", "sick", "stomach"],
    ),
    (FallbackTopic::Pain, &["pain", "hurt", "ache"]),
];

impl FallbackTopic {
    /// Chooses the topic for `message`.
    pub fn select(message: &str) -> Self {
        let folded = message.to_lowercase();
        TOPIC_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| folded.contains(k)))
            .map(|(topic, _)| *topic)
            .unwrap_or(FallbackTopic::General)
    }

    pub fn script(self) -> &'static str {
        match self {
            FallbackTopic::Headache => HEADACHE_SCRIPT,
            FallbackTopic::Fever => FEVER_SCRIPT,
            FallbackTopic::Cough => COUGH_SCRIPT,
            FallbackTopic::Nausea => NAUSEA_SCRIPT,
            FallbackTopic::Pain => PAIN_SCRIPT,
            FallbackTopic::General => GENERAL_SCRIPT,
        }
    }
}

/// The canned reply for `message`.
pub fn fallback_reply(message: &str) -> &'static str {
    FallbackTopic::select(message).script()
}

const HEADACHE_SCRIPT: &str = "I see you're dealing with headaches. Let me help you understand what might be going on.

Most headaches are caused by tension, stress, dehydration, or lack of sleep. Sometimes it's eye strain from screens or sinus pressure.

**What you can try right now:**
Rest in a dark, quiet room, drink some water, and maybe use a cold compress on your forehead.

**You should see a doctor if:**
- The headache is sudden and severe
- You have fever, stiff neck, or vision changes
- It's getting worse or happening frequently

Take care of yourself, and don't hesitate to get checked if you're worried.";

const FEVER_SCRIPT: &str = "A fever means your body is fighting something - usually an infection like a cold, flu, or bacterial infection.

**Here's what I recommend:**
- Rest and drink plenty of fluids
- Take acetaminophen or ibuprofen if needed
- Wear light clothes and keep cool
- Monitor your temperature

**Call a doctor if:**
- Fever goes above 103°F (39.4°C)
- You have trouble breathing or chest pain
- Fever lasts more than 3 days
- You're getting dehydrated

Your body knows how to fight infections, but sometimes it needs medical help. Don't wait if you're concerned.";

const COUGH_SCRIPT: &str = "Coughs are usually from colds, allergies, or respiratory irritation. Sometimes it's acid reflux or asthma.

**Try these remedies:**
- Stay hydrated - it helps thin mucus
- Use a humidifier or breathe steam
- Honey can soothe your throat (adults only)
- Avoid smoke and strong scents

**See a doctor if:**
- Cough lasts more than 2-3 weeks
- You're coughing up blood
- You have fever with the cough
- You're having trouble breathing

Most coughs resolve on their own, but persistent ones need evaluation.";

const NAUSEA_SCRIPT: &str = "Stomach troubles are common - could be a stomach bug, food poisoning, stress, or even medication side effects.

**Here's my advice:**
- Sip small amounts of water or clear fluids
- Try bland foods like toast, rice, or bananas
- Avoid dairy, caffeine, and greasy foods
- Ginger can help with nausea

**Get medical help if:**
- You're severely dehydrated
- There's blood in your vomit
- You have high fever
- Severe abdominal pain

Most stomach issues resolve in 24-48 hours, but don't suffer if it's getting worse.";

const PAIN_SCRIPT: &str = "Pain is your body's way of telling you something needs attention. The location and type of pain helps determine the cause.

**General pain management:**
- Rest the affected area
- Apply ice for acute injuries, heat for muscle tension
- Over-the-counter pain relievers can help
- Gentle movement often helps more than complete rest

**See a doctor for:**
- Severe or worsening pain
- Pain after an injury
- Pain with other concerning symptoms
- Pain that interferes with daily activities

I'd need more details about your specific pain to give better guidance. Don't ignore persistent pain.";

const GENERAL_SCRIPT: &str = "I understand you're concerned about your symptoms. While I can provide general information, every person is unique.

**My recommendation:**
Schedule an appointment with your doctor or visit urgent care. They can properly examine you, consider your medical history, and provide the right treatment.

**For immediate concerns:**
- Call your doctor's office
- Visit urgent care
- Go to the ER for emergencies

**In the meantime:**
Stay hydrated, get rest, and monitor your symptoms.

Remember, I'm here to provide information, but a real doctor should evaluate your specific situation. Your health is important - don't hesitate to seek proper medical care.";
