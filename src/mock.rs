//! Offline thesis generator used when no provider answers.
//!
//! Titles come from a static bank keyed by field and thesis type. The
//! generator never invents a title outside that bank, so asking for more
//! ideas than a bank holds yields fewer ideas.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::models::{ThesisType, Tone};

pub const DEFAULT_FIELD: &str = "computer science";
pub const IDEA_DELIMITER: &str = "---";

struct FieldBank {
    key: &'static str,
    aliases: &'static [&'static str],
    argumentative: &'static [&'static str],
    analytical: &'static [&'static str],
    expository: &'static [&'static str],
    comparative: &'static [&'static str],
}

impl FieldBank {
    fn titles(&self, thesis_type: ThesisType) -> &'static [&'static str] {
        match thesis_type {
            ThesisType::Argumentative => self.argumentative,
            ThesisType::Analytical => self.analytical,
            ThesisType::Expository => self.expository,
            ThesisType::Comparative => self.comparative,
        }
    }
}

static BANKS: &[FieldBank] = &[
    FieldBank {
        key: "computer science",
        aliases: &["cs", "computing", "software engineering", "informatics"],
        argumentative: &[
            "Memory-Safe Languages Should Replace C in New Operating System Components",
            "Formal Verification Must Become a Standard Step in Safety-Critical Software Delivery",
            "Open-Source Compilers Provide Better Long-Term Value Than Proprietary Toolchains",
            "Static Type Systems Reduce Defect Density More Effectively Than Additional Testing",
            "Energy Consumption Should Be a First-Class Metric in Algorithm Design",
        ],
        analytical: &[
            "Analyzing Cache Behavior of Lock-Free Data Structures on Many-Core Processors",
            "An Analysis of Technical Debt Accumulation in Long-Lived Microservice Systems",
            "Examining Query Optimizer Failures in Distributed SQL Databases",
            "Analyzing Tail Latency Sources in Container-Orchestrated Web Services",
            "Evaluating the Accessibility Gaps of Mobile Interfaces for Older Adults",
        ],
        expository: &[
            "How Consensus Protocols Keep Replicated Databases Consistent",
            "The Evolution of Garbage Collection Techniques in Managed Runtimes",
            "Explaining Software-Defined Networking and Its Control Plane Design",
            "How Modern Version Control Systems Model Project History",
        ],
        comparative: &[
            "Comparing Actor-Based and Shared-Memory Concurrency for Server Workloads",
            "Relational Versus Document Databases for Evolving Application Schemas",
            "Comparing Code Review Practices in Open-Source and Industrial Projects",
            "Monolithic Versus Microservice Architectures for Small Engineering Teams",
        ],
    },
    FieldBank {
        key: "cybersecurity",
        aliases: &["cyber security", "information security", "infosec", "network security"],
        argumentative: &[
            "Passwordless Authentication Should Become the Default for Consumer Services",
            "Software Vendors Should Bear Liability for Exploitable Memory-Safety Defects",
            "Mandatory Breach Disclosure Timelines Improve Industry-Wide Security Posture",
            "Security Awareness Training Alone Cannot Stop Targeted Phishing Campaigns",
        ],
        analytical: &[
            "Analyzing the Effectiveness of Zero-Trust Architectures in Hybrid Cloud Environments",
            "An Analysis of Supply-Chain Attack Vectors in Open-Source Package Ecosystems",
            "Examining Detection Gaps of Signature-Based Intrusion Systems Against Polymorphic Malware",
            "Analyzing Ransomware Recovery Costs Across Small and Medium Enterprises",
            "Evaluating Side-Channel Leakage in Shared Cloud Hardware",
        ],
        expository: &[
            "How Public Key Infrastructure Establishes Trust on the Web",
            "The Lifecycle of a Coordinated Vulnerability Disclosure",
            "Explaining Threat Modeling Methods for Distributed Applications",
            "How Security Operations Centers Triage and Escalate Incidents",
        ],
        comparative: &[
            "Comparing Endpoint Detection Platforms Against Living-off-the-Land Techniques",
            "Rule-Based Versus Anomaly-Based Network Intrusion Detection",
            "Comparing Post-Quantum Key Exchange Candidates for Constrained Devices",
            "Bug Bounty Programs Versus Internal Red Teams in Vulnerability Discovery",
        ],
    },
    FieldBank {
        key: "psychology",
        aliases: &["cognitive science", "behavioral science"],
        argumentative: &[
            "Schools Should Integrate Mindfulness Training Into Core Curricula",
            "Social Media Platforms Bear Responsibility for Adolescent Anxiety Trends",
            "Remote Therapy Is as Effective as In-Person Treatment for Mild Depression",
            "Replication Requirements Should Precede Publication in Behavioral Research",
        ],
        analytical: &[
            "Analyzing the Role of Sleep Quality in Working Memory Performance",
            "An Analysis of Confirmation Bias in Online Information Seeking",
            "Examining Coping Strategies Among First-Generation University Students",
            "Analyzing Burnout Predictors Among Healthcare Workers After Crisis Periods",
        ],
        expository: &[
            "How Attachment Styles Develop From Infancy to Adulthood",
            "The Mechanisms Behind Habit Formation and Habit Change",
            "Explaining the Cognitive Model of Panic Disorder",
            "How Memory Reconsolidation Shapes Recalled Experiences",
        ],
        comparative: &[
            "Comparing Cognitive Behavioral and Acceptance-Based Therapies for Anxiety",
            "Individualist Versus Collectivist Cultures in Expressions of Grief",
            "Comparing Intrinsic and Extrinsic Motivation in Workplace Learning",
            "Group Versus Individual Interventions for Adolescent Substance Use",
        ],
    },
    FieldBank {
        key: "biology",
        aliases: &["life sciences", "molecular biology", "genetics", "ecology"],
        argumentative: &[
            "Gene Drive Technologies Require International Governance Before Field Release",
            "Urban Green Corridors Should Be Mandatory to Protect Pollinator Populations",
            "Public Funding Should Prioritize Antibiotic Discovery Over Incremental Drug Variants",
            "De-Extinction Efforts Divert Resources From Proven Conservation Strategies",
        ],
        analytical: &[
            "Analyzing Microbiome Shifts Following Broad-Spectrum Antibiotic Treatment",
            "An Analysis of Coral Bleaching Resilience Across Reef Microhabitats",
            "Examining Gene Expression Changes Under Drought Stress in Cereal Crops",
            "Analyzing Horizontal Gene Transfer as a Driver of Antimicrobial Resistance",
        ],
        expository: &[
            "How CRISPR-Cas Systems Edit Genomes",
            "The Role of Keystone Species in Ecosystem Stability",
            "Explaining Epigenetic Inheritance Across Generations",
            "How the Immune System Distinguishes Self From Non-Self",
        ],
        comparative: &[
            "Comparing Regeneration Mechanisms in Planarians and Axolotls",
            "In Vitro Versus In Vivo Models for Studying Neurodegeneration",
            "Comparing Pollination Efficiency of Native Bees and Honeybees",
            "Comparing Marine and Freshwater Adaptations in Euryhaline Fish",
        ],
    },
    FieldBank {
        key: "economics",
        aliases: &["finance", "business", "econ"],
        argumentative: &[
            "Carbon Taxes Outperform Cap-and-Trade Schemes in Reducing Emissions",
            "Universal Basic Income Trials Justify Broader National Adoption",
            "Central Bank Digital Currencies Threaten Commercial Bank Stability",
            "Minimum Wage Indexing to Inflation Benefits Low-Income Households",
        ],
        analytical: &[
            "Analyzing the Effect of Remote Work on Urban Housing Markets",
            "An Analysis of Gig Economy Income Volatility and Household Savings",
            "Examining Supply Chain Concentration Risk After Global Disruptions",
            "Analyzing Microfinance Outcomes for Women Entrepreneurs",
        ],
        expository: &[
            "How Central Banks Transmit Monetary Policy to the Real Economy",
            "The Mechanics of Sovereign Debt Restructuring",
            "Explaining Network Effects in Platform Markets",
            "How Behavioral Economics Explains Retirement Under-Saving",
        ],
        comparative: &[
            "Comparing Fiscal Stimulus Outcomes in Advanced and Emerging Economies",
            "Public Versus Private Provision of Urban Transit",
            "Comparing Inflation Targeting Regimes Across Small Open Economies",
            "Cooperative Versus Shareholder Firms in Employee Retention",
        ],
    },
    FieldBank {
        key: "education",
        aliases: &["pedagogy", "teaching", "educational technology"],
        argumentative: &[
            "Standardized Testing Should Be Replaced by Portfolio Assessment in Secondary Schools",
            "Coding Literacy Deserves Equal Standing With Foreign Language Requirements",
            "Smaller Class Sizes Matter More Than Technology Spending",
            "Universities Should Grant Credit for Verified Open Online Courses",
        ],
        analytical: &[
            "Analyzing Dropout Patterns in Massive Open Online Courses",
            "An Analysis of Feedback Timing and Student Revision Quality",
            "Examining Teacher Retention in Rural School Districts",
            "Analyzing the Impact of Generative AI Tools on Student Writing",
        ],
        expository: &[
            "How Spaced Repetition Improves Long-Term Retention",
            "The Principles of Universal Design for Learning",
            "Explaining Flipped Classroom Models and Their Implementation",
            "How Formative Assessment Guides Daily Instruction",
        ],
        comparative: &[
            "Comparing Project-Based and Direct Instruction in Mathematics",
            "Online Versus Blended Delivery in Adult Continuing Education",
            "Comparing Bilingual Education Models for Early Literacy",
            "Peer Tutoring Versus Teacher-Led Review Sessions",
        ],
    },
    FieldBank {
        key: "environmental science",
        aliases: &["environment", "climate science", "sustainability", "environmental studies"],
        argumentative: &[
            "Nuclear Energy Is Essential for Meeting Mid-Century Decarbonization Targets",
            "Single-Use Plastic Bans Are More Effective Than Recycling Incentives",
            "Rewilding Should Take Priority Over Afforestation Monocultures",
            "Cities Should Price Road Use to Cut Transport Emissions",
        ],
        analytical: &[
            "Analyzing Microplastic Accumulation in Freshwater Sediments",
            "An Analysis of Urban Heat Island Mitigation Through Green Roofs",
            "Examining Groundwater Depletion Trends in Irrigated Agriculture",
            "Analyzing Wildfire Frequency Against Land Management Practices",
        ],
        expository: &[
            "How Carbon Capture and Storage Technologies Work",
            "The Nitrogen Cycle and Its Disruption by Fertilizer Use",
            "Explaining Climate Feedback Loops in Polar Regions",
            "How Life Cycle Assessment Quantifies Environmental Impact",
        ],
        comparative: &[
            "Comparing Solar and Wind Integration Challenges on Regional Grids",
            "Organic Versus Conventional Farming in Soil Carbon Retention",
            "Comparing Desalination and Water Reuse for Arid Cities",
            "Comparing Electric and Hydrogen Vehicles on Lifecycle Emissions",
        ],
    },
];

static METHODOLOGIES: &[&str] = &[
    "A mixed-methods design combines a systematic literature review with semi-structured expert interviews.",
    "A quantitative study analyzes a curated public dataset using regression and significance testing.",
    "A comparative case study examines several real-world settings to identify recurring patterns.",
    "An experimental design tests the central hypothesis under controlled conditions with a baseline group.",
    "A longitudinal study tracks key indicators over time to separate short-term effects from lasting ones.",
    "A design-science approach builds a prototype and evaluates it against clearly defined criteria.",
];

static CONTRIBUTIONS: &[&str] = &[
    "provide an evidence-based framework that practitioners can apply directly",
    "fill a documented gap in the current literature with new empirical findings",
    "offer policy recommendations grounded in measurable outcomes",
    "establish a reusable methodology that future studies can extend",
    "challenge a widely held assumption and propose a better-supported alternative",
];

// Lowercase, keep letters and digits only, so "Cyber-Security" matches "cybersecurity".
fn compact(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn find_bank(field: &str) -> &'static FieldBank {
    let wanted = compact(field);
    BANKS
        .iter()
        .find(|bank| {
            compact(bank.key) == wanted || bank.aliases.iter().any(|alias| compact(alias) == wanted)
        })
        .or_else(|| BANKS.iter().find(|bank| bank.key == DEFAULT_FIELD))
        .unwrap_or(&BANKS[0])
}

/// Bank key the field resolves to, e.g. "Cyber Security" -> "cybersecurity".
pub fn field_key(field: &str) -> &'static str {
    find_bank(field).key
}

/// Candidate titles for a field and thesis type.
pub fn bank(field: &str, thesis_type: ThesisType) -> &'static [&'static str] {
    find_bank(field).titles(thesis_type)
}

pub fn bank_size(field: &str, thesis_type: ThesisType) -> usize {
    bank(field, thesis_type).len()
}

/// Renders up to `num_ideas` idea blocks separated by a `---` line.
pub fn generate_mock<R: Rng>(
    rng: &mut R,
    field: &str,
    num_ideas: u32,
    thesis_type: ThesisType,
    tone: Tone,
) -> String {
    let titles = bank(field, thesis_type);
    let count = (num_ideas as usize).min(titles.len());

    let blocks: Vec<String> = titles
        .choose_multiple(rng, count)
        .enumerate()
        .map(|(i, title)| {
            let methodology = METHODOLOGIES[rng.gen_range(0..METHODOLOGIES.len())];
            let contribution = CONTRIBUTIONS[rng.gen_range(0..CONTRIBUTIONS.len())];
            format!(
                "Thesis Idea {n}: {title}\n\n\
                 Research Overview: This {thesis_type} thesis investigates a focused question in {field}, \
                 presented in a {tone} register and scoped to be completed within a single research project.\n\n\
                 Methodology: {methodology}\n\n\
                 Expected Contribution: This research will {contribution}.",
                n = i + 1,
            )
        })
        .collect();

    blocks
        .join(&format!("\n\n{}\n\n", IDEA_DELIMITER))
        .trim()
        .to_string()
}
