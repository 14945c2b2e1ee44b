use super::domain::{CourseTemplate, Difficulty, RecommendationEntry};
use crate::workflows::questions::{Category, GradeBand};

/// One tailored row of the recommendation table.
#[derive(Debug, Clone)]
pub(super) struct TableRow {
    pub style: Category,
    pub band: GradeBand,
    pub entry: RecommendationEntry,
}

const fn course(
    name: &'static str,
    subject: &'static str,
    description: &'static str,
    difficulty: Difficulty,
    duration_weeks: u8,
) -> CourseTemplate {
    CourseTemplate {
        name,
        subject,
        description,
        difficulty,
        duration_weeks,
    }
}

fn row(style: Category, band: GradeBand, entry: RecommendationEntry) -> TableRow {
    TableRow { style, band, entry }
}

pub(super) fn standard_rows() -> Vec<TableRow> {
    use Category::*;
    use Difficulty::*;
    use GradeBand::*;

    vec![
        row(
            Visual,
            Elementary,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Scratch Programming Fundamentals",
                        "coding",
                        "Build interactive stories and games with visual, block-based code.",
                        Beginner,
                        12,
                    ),
                    course(
                        "Comic Book Storytelling",
                        "creative_arts",
                        "Plan, sketch, and publish short illustrated stories.",
                        Beginner,
                        8,
                    ),
                ],
                learning_path: "Start from pictures and diagrams, then move toward explaining each drawing in words.",
                careers: vec!["Illustrator", "Game designer", "Architect"],
                colleges: vec!["Art and design foundation programs", "Architecture schools"],
                exams: vec!["International Drawing Olympiad", "Math Kangaroo"],
            },
        ),
        row(
            Visual,
            Middle,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Digital Design with Canva and Figma",
                        "design",
                        "Layout, color, and typography through short design challenges.",
                        Intermediate,
                        10,
                    ),
                    course(
                        "Data Visualization for Young Analysts",
                        "math",
                        "Turn survey data into charts that tell a story.",
                        Intermediate,
                        8,
                    ),
                ],
                learning_path: "Use mind maps and charts to organize each unit before practicing problems.",
                careers: vec!["UX designer", "Data visualization specialist", "Animator"],
                colleges: vec!["Design schools", "Media and communication programs"],
                exams: vec!["UKMT Junior Challenge", "SOF International Math Olympiad"],
            },
        ),
        row(
            Visual,
            High,
            RecommendationEntry {
                courses: vec![
                    course(
                        "3D Modeling and Animation",
                        "design",
                        "Model, texture, and animate scenes in Blender.",
                        Advanced,
                        14,
                    ),
                    course(
                        "Introduction to Data Science",
                        "ai",
                        "Explore real datasets with notebooks and visual analysis.",
                        Advanced,
                        14,
                    ),
                ],
                learning_path: "Build a visual portfolio project each term that pulls together what was studied.",
                careers: vec!["Architect", "Product designer", "Data scientist"],
                colleges: vec![
                    "Rhode Island School of Design",
                    "Delft University of Technology",
                    "National Institute of Design",
                ],
                exams: vec!["SAT", "IB Visual Arts", "AP Art and Design"],
            },
        ),
        row(
            Auditory,
            Middle,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Public Speaking and Debate",
                        "communication",
                        "Structured debate formats with weekly practice rounds.",
                        Intermediate,
                        10,
                    ),
                    course(
                        "Podcast Production",
                        "media",
                        "Script, record, and edit a short podcast series.",
                        Beginner,
                        8,
                    ),
                ],
                learning_path: "Talk through each new idea aloud and summarize lessons as short recordings.",
                careers: vec!["Journalist", "Lawyer", "Radio producer"],
                colleges: vec!["Communication and media programs", "Liberal arts colleges"],
                exams: vec!["World Scholar's Cup", "Cambridge English Qualifications"],
            },
        ),
        row(
            Auditory,
            High,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Model United Nations",
                        "communication",
                        "Research positions and negotiate resolutions in committee sessions.",
                        Advanced,
                        12,
                    ),
                    course(
                        "Music Theory and Composition",
                        "music",
                        "Harmony, ear training, and composing short pieces.",
                        Intermediate,
                        12,
                    ),
                ],
                learning_path: "Join discussion-based classes and review material through spoken summaries.",
                careers: vec!["Diplomat", "Teacher", "Audio engineer"],
                colleges: vec!["Berklee College of Music", "Sciences Po", "Georgetown University"],
                exams: vec!["IELTS", "TOEFL", "AP English Language"],
            },
        ),
        row(
            Kinesthetic,
            Elementary,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Junior Robotics",
                        "robotics",
                        "Build and program simple robots with LEGO WeDo kits.",
                        Beginner,
                        10,
                    ),
                    course(
                        "Science Through Experiments",
                        "science",
                        "Weekly hands-on experiments with simple lab notebooks.",
                        Beginner,
                        8,
                    ),
                ],
                learning_path: "Learn each concept by building or acting it out before writing it down.",
                careers: vec!["Engineer", "Athletic trainer", "Chef"],
                colleges: vec!["Engineering foundation programs"],
                exams: vec!["First LEGO League", "Math Kangaroo"],
            },
        ),
        row(
            Kinesthetic,
            Middle,
            RecommendationEntry {
                courses: vec![
                    course(
                        "LEGO Robotics Engineering",
                        "robotics",
                        "Design, build, and program robots using LEGO Mindstorms.",
                        Intermediate,
                        16,
                    ),
                    course(
                        "Maker Lab: Electronics",
                        "engineering",
                        "Circuits, sensors, and microcontrollers through small builds.",
                        Intermediate,
                        12,
                    ),
                ],
                learning_path: "Pair every theory lesson with a build, then explain how the build works.",
                careers: vec!["Mechanical engineer", "Physiotherapist", "Product maker"],
                colleges: vec!["Polytechnic institutes", "Applied engineering programs"],
                exams: vec!["VEX Robotics Competition", "National Science Olympiad"],
            },
        ),
        row(
            Logical,
            Middle,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Python Programming for Beginners",
                        "coding",
                        "Move from block-based to text-based programming with Python.",
                        Intermediate,
                        14,
                    ),
                    course(
                        "Vedic Mathematics",
                        "math",
                        "Rapid calculation techniques and alternative algorithms.",
                        Intermediate,
                        12,
                    ),
                ],
                learning_path: "Work through problems in ordered steps and look for the pattern behind each method.",
                careers: vec!["Software developer", "Mathematician", "Financial analyst"],
                colleges: vec!["Computer science programs", "Mathematics departments"],
                exams: vec!["AMC 8", "SOF International Math Olympiad", "Bebras Challenge"],
            },
        ),
        row(
            Logical,
            High,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Advanced Programming with Python",
                        "coding",
                        "Object-oriented design, data structures, and algorithms.",
                        Advanced,
                        16,
                    ),
                    course(
                        "Introduction to AI and Machine Learning",
                        "ai",
                        "Core machine learning algorithms and their ethical use.",
                        Advanced,
                        14,
                    ),
                ],
                learning_path: "Tackle competition-style problems and document the reasoning behind each solution.",
                careers: vec!["Software engineer", "Data scientist", "Actuary"],
                colleges: vec![
                    "Massachusetts Institute of Technology",
                    "ETH Zurich",
                    "Indian Institutes of Technology",
                ],
                exams: vec!["SAT", "AMC 12", "International Olympiad in Informatics"],
            },
        ),
        row(
            Social,
            High,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Young Entrepreneurs",
                        "entrepreneurship",
                        "Develop a business idea and pitch it to a panel.",
                        Intermediate,
                        12,
                    ),
                    course(
                        "Leadership and Community Projects",
                        "leadership",
                        "Plan and run a service project with a team.",
                        Intermediate,
                        10,
                    ),
                ],
                learning_path: "Study in groups and teach each new topic to a peer.",
                careers: vec!["Teacher", "Psychologist", "Entrepreneur"],
                colleges: vec!["London School of Economics", "University of Toronto"],
                exams: vec!["SAT", "IB Diploma", "Model United Nations"],
            },
        ),
        row(
            Solitary,
            High,
            RecommendationEntry {
                courses: vec![
                    course(
                        "Independent Research Methods",
                        "research",
                        "Plan and complete a self-directed research paper.",
                        Advanced,
                        14,
                    ),
                    course(
                        "Creative Writing Workshop",
                        "writing",
                        "Short fiction and essays with written feedback cycles.",
                        Intermediate,
                        10,
                    ),
                ],
                learning_path: "Set personal milestones and review progress against them each week.",
                careers: vec!["Researcher", "Writer", "Software developer"],
                colleges: vec!["University of Oxford", "University of Melbourne"],
                exams: vec!["SAT", "AP Research", "IB Extended Essay"],
            },
        ),
    ]
}

/// Generic fallback, chosen by grade band only.
pub(super) fn default_entry(band: GradeBand) -> RecommendationEntry {
    use Difficulty::*;

    match band {
        GradeBand::Early => RecommendationEntry {
            courses: vec![
                course(
                    "Junior Coding Adventures",
                    "coding",
                    "An introductory coding course for young learners using block-based programming.",
                    Beginner,
                    8,
                ),
                course(
                    "Math Explorers",
                    "math",
                    "A fun, hands-on approach to early mathematics concepts.",
                    Beginner,
                    10,
                ),
                course(
                    "Creative Storytelling",
                    "creative_arts",
                    "Develops imagination and communication through storytelling.",
                    Beginner,
                    6,
                ),
            ],
            learning_path: "Explore many kinds of activities through play and notice which ones hold attention longest.",
            careers: vec!["Too early to narrow down; keep exploring"],
            colleges: Vec::new(),
            exams: vec!["Math Kangaroo"],
        },
        GradeBand::Elementary => RecommendationEntry {
            courses: vec![
                course(
                    "Scratch Programming Fundamentals",
                    "coding",
                    "Learn to code using Scratch to create interactive stories and games.",
                    Beginner,
                    12,
                ),
                course(
                    "Abacus Math Mastery",
                    "abacus",
                    "Learn mental math techniques using the abacus method.",
                    Intermediate,
                    16,
                ),
                course(
                    "Junior Robotics",
                    "robotics",
                    "Introduction to robotics using LEGO WeDo or similar platforms.",
                    Beginner,
                    10,
                ),
            ],
            learning_path: "Mix hands-on projects with short reading and listening tasks to build every style.",
            careers: vec!["Scientist", "Engineer", "Artist"],
            colleges: Vec::new(),
            exams: vec!["Math Kangaroo", "SOF International Math Olympiad"],
        },
        GradeBand::Middle => RecommendationEntry {
            courses: vec![
                course(
                    "Python Programming for Beginners",
                    "coding",
                    "Introduction to text-based programming using Python.",
                    Intermediate,
                    14,
                ),
                course(
                    "Vedic Mathematics",
                    "vedic_math",
                    "Ancient Indian mathematical techniques for rapid calculation.",
                    Intermediate,
                    12,
                ),
                course(
                    "LEGO Robotics Engineering",
                    "robotics",
                    "Design, build, and program robots using LEGO Mindstorms.",
                    Intermediate,
                    16,
                ),
            ],
            learning_path: "Try one course in each subject area and keep a journal of what felt easiest.",
            careers: vec!["Software developer", "Engineer", "Designer"],
            colleges: vec!["STEM-focused high school programs"],
            exams: vec!["AMC 8", "National Science Olympiad"],
        },
        GradeBand::High => RecommendationEntry {
            courses: vec![
                course(
                    "Advanced Programming with Python",
                    "coding",
                    "Develop sophisticated applications and algorithms using Python.",
                    Advanced,
                    16,
                ),
                course(
                    "Introduction to AI and Machine Learning",
                    "ai",
                    "Explore the fundamentals of artificial intelligence and machine learning.",
                    Advanced,
                    14,
                ),
                course(
                    "Young Entrepreneurs",
                    "entrepreneurship",
                    "Learn to develop business ideas and create a business plan.",
                    Intermediate,
                    12,
                ),
            ],
            learning_path: "Pick one subject for deep study while keeping a broad base for college applications.",
            careers: vec!["Engineer", "Business analyst", "Healthcare professional"],
            colleges: vec!["Research universities", "Liberal arts colleges"],
            exams: vec!["SAT", "ACT", "IELTS"],
        },
    }
}
