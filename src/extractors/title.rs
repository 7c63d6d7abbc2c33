use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::extractors::{Extractor, FactType, RawFact};

/// Fuzzy matches below this similarity (percent) are discarded.
const FUZZY_THRESHOLD: u32 = 30;
/// At most this many fuzzy titles are reported per text.
const FUZZY_LIMIT: usize = 5;

/// Fixed job-title vocabulary for exact and fuzzy matching.
const TITLE_KEYWORDS: &[&str] = &[
    "CEO", "CTO", "CFO", "COO", "President", "Director", "Chief", "Strategist", "Logistics",
    "Manager", "Engineer", "Developer", "Designer", "Analyst", "Specialist", "Supply Chain",
    "Coordinator", "Administrator", "Supervisor", "Lead", "Head", "VP", "Production",
    "Pilot", "Technician", "Scientist", "Inspector", "Consultant", "Architect", "Assistant",
    "Associate", "Operator", "Instructor", "Planner", "Estimator", "Fabricator",
    "Assembler", "Machinist", "Welder", "Mechanic", "Tester", "Trainer", "Project",
    "Marketing", "Systems", "Avionics", "Researcher", "Flight", "Manufacturing",
    "Investigator", "Quality", "Assurance", "Service", "Support", "Relations", "Compliance",
    "Electrical", "IT", "Structural", "Mechanical", "Aerospace", "Business", "Sales", "HR",
    "Recruiter", "Recruitment", "Materials", "Safety", "Reliability", "Research",
    "Field Service", "Cybersecurity", "Ordnance", "Legal Counsel", "Maintenance",
    "Agent", "Human Resources", "Procurement", "Operations", "Business Development",
    "Integration", "Mission", "Payload", "Propulsion", "Dr.", "Regulatory Affairs",
    "Internal Affairs", "External Affairs", "Public Relations", "Acquisition", "Configuration",
    "Risk", "Test", "Calibration", "Inventory", "Contractor", "Talent", "Training", "Officer",
    "Compliance Officer", "Legal Advisor", "Technical Lead", "Data Scientist", "Data Engineer",
    "Product Manager", "Product Owner", "Program Manager", "Scrum Master", "Product Designer",
    "User Experience", "UX", "UI", "Security", "Infrastructure", "DevOps", "Cloud", "AI",
    "Machine Learning", "Artificial Intelligence", "Big Data", "Data Analyst", "Data Architect",
    "Solutions Architect", "Enterprise Architect", "Chief Information Officer", "CIO",
    "Chief Security Officer", "CSO", "Chief Data Officer", "CDO", "Chief Technology Officer",
    "Chief Marketing Officer", "CMO", "Chief Operations Officer", "Chief Revenue Officer", "CRO",
    "Chief Financial Officer", "Financial Analyst", "Investment Analyst", "Portfolio Manager",
    "Account Manager", "Account Executive", "Sales Executive", "Sales Manager", "Sales Director",
    "Customer Success", "Customer Support", "Client Services", "Partner Manager", "Channel Manager",
    "Vendor Manager", "Supplier Manager", "Procurement Specialist", "Logistics Coordinator",
    "Logistics Manager", "Supply Chain Manager", "Supply Chain Analyst", "Material Planner",
    "Material Manager", "Material Coordinator", "Warehouse Manager", "Warehouse Supervisor",
    "Operations Manager", "Operations Coordinator", "Operations Analyst", "Operations Director",
    "Human Resources Manager", "HR Coordinator", "HR Analyst", "Talent Acquisition",
    "Learning and Development", "L&D", "Employee Relations", "Compensation and Benefits",
    "Payroll Specialist", "Payroll Manager", "Risk Management", "Compliance Manager",
    "Internal Auditor", "External Auditor", "Financial Controller", "Finance Director",
    "Finance Manager", "Budget Analyst", "Financial Planner", "Business Analyst",
    "Business Intelligence", "BI", "BI Analyst", "IT Manager", "IT Director",
    "Chief Digital Officer", "Digital Transformation", "Digital Marketing", "SEO", "SEM",
    "Content Manager", "Content Strategist", "Content Creator", "Social Media Manager",
    "Social Media Strategist", "Creative Director", "Art Director", "Copywriter",
    "Content Writer", "Editor", "Proofreader", "Technical Writer", "Software Engineer",
    "Software Developer", "Frontend Developer", "Backend Developer", "Full Stack Developer",
    "Mobile Developer", "iOS Developer", "Android Developer", "Web Developer", "Game Developer",
    "Embedded Systems Engineer", "Hardware Engineer", "Firmware Engineer", "Network Engineer",
    "Systems Administrator", "IT Support", "Help Desk", "Technical Support",
    "Customer Support Engineer", "Service Desk", "Field Technician", "Site Reliability Engineer",
    "Security Analyst", "Security Engineer", "Penetration Tester", "Ethical Hacker",
    "Security Consultant", "Security Architect", "Compliance Analyst", "Regulatory Compliance",
    "Data Protection Officer", "DPO", "General Counsel", "Paralegal", "Legal Assistant",
    "Litigation Support", "Contract Manager", "Contract Administrator", "Patent Agent",
    "Patent Attorney", "Trademark Attorney", "Real Estate Manager", "Property Manager",
    "Facility Manager", "Maintenance Technician", "Maintenance Manager", "Facilities Coordinator",
    "Building Services", "Environmental Health and Safety", "EHS", "Safety Officer",
    "Safety Manager", "HSE", "Health and Safety", "Construction Manager", "Construction Engineer",
    "Site Manager", "Site Engineer", "Project Coordinator", "Project Manager",
    "Senior Project Manager", "Program Director", "PMO", "Change Manager",
    "Organizational Change", "Transformation Manager", "Business Transformation",
    "Business Process Analyst", "Process Engineer", "Continuous Improvement",
    "Lean Manufacturing", "Six Sigma", "Agile Coach", "Product Director", "R&D",
    "Research and Development", "Innovation Manager", "Innovation Director",
    "Principal Engineer", "Senior Engineer", "Lead Engineer", "Field Engineer",
    "Field Service Engineer", "Applications Engineer", "Application Support",
    "Technical Account Manager", "TAM", "Customer Engineer", "Customer Success Manager",
    "Customer Experience", "CX", "Client Relations", "Client Success",
    "Business Development Manager", "BDM", "Sales Engineer", "Pre-Sales", "Post-Sales",
    "Technical Sales", "Solution Engineer", "Solution Architect", "Solution Consultant",
    "Implementation Specialist", "Implementation Manager", "Customer Implementation",
    "Customer Onboarding", "Customer Training", "Training Manager", "L&D Manager",
    "Learning Specialist", "Talent Development", "Employee Development",
    "Organizational Development", "OD", "HR Business Partner", "HR Generalist", "HR Specialist",
    "HR Advisor", "HR Consultant", "HR Director", "Chief People Officer", "CPO",
    "People Operations", "People Manager", "People Director", "Talent Manager",
    "Recruitment Manager", "Recruitment Consultant", "Headhunter", "Executive Search",
    "Talent Scout", "Recruitment Specialist", "Resourcing", "Staffing", "Workforce Planning",
    "Workforce Manager", "HRIS", "HR Information Systems", "HR Systems", "HR Technology",
    "Compensation Analyst", "Benefits Manager", "Reward Analyst", "Reward Manager",
    "Benefits Analyst", "Employee Benefits", "Labor Relations", "Industrial Relations",
    "Union Representative", "Employee Engagement", "Employee Experience", "Wellness Manager",
    "Wellbeing Manager", "Corporate Social Responsibility", "CSR", "Diversity and Inclusion",
    "D&I", "Diversity Officer", "Inclusion Officer", "Ethics Officer", "Code of Conduct",
    "Governance", "Board Director", "Board Member", "Non-Executive Director", "Trustee",
    "Chairperson", "Vice Chairperson", "Board Secretary", "Audit Committee",
    "Remuneration Committee", "Nomination Committee", "Risk Committee", "Governance Committee",
    "Advisory Board", "Technical Advisor", "Industry Expert", "Consulting Engineer",
    "Senior Consultant", "Management Consultant", "Strategy Consultant", "Advisory Consultant",
    "Business Consultant", "Financial Consultant", "IT Consultant", "Technology Consultant",
    "Systems Consultant", "Engineering Consultant", "Project Consultant", "Sales Consultant",
    "Marketing Consultant", "Training Consultant", "Learning Consultant",
    "Development Consultant", "Organizational Consultant", "Operations Consultant",
    "Process Consultant", "Change Consultant", "Transformation Consultant", "Lean Consultant",
    "Six Sigma Consultant", "Agile Consultant", "Scrum Consultant", "Product Consultant",
    "Program Consultant", "Innovation Consultant", "Research Consultant", "Data Consultant",
    "Compliance Consultant", "Regulatory Consultant", "Legal Consultant", "Contracts Manager",
    "Contracts Specialist", "Bid Manager", "Proposal Manager", "Procurement Officer",
    "Procurement Manager", "Purchasing Manager", "Supply Chain Director", "Logistics Director",
    "Inventory Manager", "Stock Manager", "Materials Manager", "Demand Planner",
    "Demand Manager", "Factory Manager", "Manufacturing Manager", "Production Manager",
    "Production Supervisor", "Production Coordinator", "Maintenance Supervisor",
    "Maintenance Engineer", "Reliability Engineer", "Asset Manager", "Asset Engineer",
    "Plant Manager", "Facilities Manager",
];

/// Job-title matching: word-bounded exact vocabulary hits at full confidence,
/// plus fuzzy sliding-window matching (2-4 word windows) scored by
/// normalized edit distance, reported at confidence = similarity / 100.
pub struct TitleExtractor {
    exact_regex: Regex,
    lowered_vocab: Vec<(String, &'static str)>,
}

impl TitleExtractor {
    pub fn new() -> Self {
        let alternation = TITLE_KEYWORDS
            .iter()
            .map(|keyword| regex::escape(keyword))
            .collect::<Vec<_>>()
            .join("|");
        let exact_regex = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
            .case_insensitive(true)
            .build()
            .unwrap();
        let lowered_vocab = TITLE_KEYWORDS
            .iter()
            .map(|keyword| (keyword.to_lowercase(), *keyword))
            .collect();
        Self {
            exact_regex,
            lowered_vocab,
        }
    }

    fn fuzzy_matches(&self, text: &str) -> Vec<(&'static str, u32)> {
        let words: Vec<&str> = text.split_whitespace().collect();
        let mut best: HashMap<&'static str, u32> = HashMap::new();

        for window_len in 2..=4usize {
            if words.len() < window_len {
                break;
            }
            for window in words.windows(window_len) {
                let phrase = window.join(" ").to_lowercase();
                for (lowered, keyword) in &self.lowered_vocab {
                    let score = similarity(&phrase, lowered);
                    if score > FUZZY_THRESHOLD {
                        let entry = best.entry(*keyword).or_insert(0);
                        if score > *entry {
                            *entry = score;
                        }
                    }
                }
            }
        }

        let mut ranked: Vec<(&'static str, u32)> = best.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        ranked.truncate(FUZZY_LIMIT);
        ranked
    }
}

impl Extractor for TitleExtractor {
    fn name(&self) -> &'static str {
        "title"
    }

    fn extract(&self, text: &str) -> Vec<RawFact> {
        let mut facts: Vec<RawFact> = self
            .exact_regex
            .find_iter(text)
            .map(|m| RawFact {
                fact_type: FactType::Title,
                value: m.as_str().to_string(),
                confidence: 1.0,
            })
            .collect();

        facts.extend(
            self.fuzzy_matches(text)
                .into_iter()
                .map(|(keyword, score)| RawFact {
                    fact_type: FactType::Title,
                    value: keyword.to_string(),
                    confidence: score as f32 / 100.0,
                }),
        );

        facts
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Percent similarity from normalized edit distance. Starts with a length
/// bound so clearly-dissimilar pairs skip the distance computation.
pub(crate) fn similarity(a: &str, b: &str) -> u32 {
    let a_len = a.chars().count();
    let b_len = b.chars().count();
    let max_len = a_len.max(b_len);
    if max_len == 0 {
        return 0;
    }
    let diff = a_len.abs_diff(b_len);
    if ((max_len - diff) * 100) / max_len <= FUZZY_THRESHOLD as usize {
        return 0;
    }
    let distance = levenshtein(a, b);
    (((max_len - distance.min(max_len)) * 100) / max_len) as u32
}

fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (prev[j + 1] + 1)
                .min(current[j] + 1)
                .min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut current);
    }
    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_score_100() {
        assert_eq!(similarity("sales manager", "sales manager"), 100);
    }

    #[test]
    fn unrelated_strings_score_low() {
        assert!(similarity("zzzz qqqq", "sales manager") <= FUZZY_THRESHOLD);
    }

    #[test]
    fn exact_vocabulary_hit_has_full_confidence() {
        let extractor = TitleExtractor::new();
        let facts = extractor.extract("Jane Doe, Chief Technology Officer");
        assert!(facts
            .iter()
            .any(|f| f.value == "Chief Technology Officer" && f.confidence == 1.0));
    }

    #[test]
    fn fuzzy_match_scales_confidence_by_similarity() {
        let extractor = TitleExtractor::new();
        // "Salez Manager" is one edit away from the vocabulary entry.
        let facts = extractor.extract("Bob works as Salez Manager here");
        let fuzzy = facts
            .iter()
            .find(|f| f.value == "Sales Manager" && f.confidence < 1.0);
        assert!(fuzzy.is_some());
        let fuzzy = fuzzy.unwrap();
        assert!(fuzzy.confidence > FUZZY_THRESHOLD as f32 / 100.0);
    }
}
