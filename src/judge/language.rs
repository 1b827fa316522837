// src/judge/language.rs

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::JudgeError;

/// Languages the practice editor offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    C,
    Cpp,
    Java,
    Python,
}

impl Language {
    pub const ALL: [Language; 4] = [Language::C, Language::Cpp, Language::Java, Language::Python];

    /// Identifier used by the client and the Backend API.
    pub fn id(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
        }
    }

    /// Runtime name understood by the Execution Service.
    pub fn runtime(&self) -> &'static str {
        match self {
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
            Language::Python => "python",
        }
    }

    /// Editor contents for a question that has no saved draft yet.
    pub fn starter_template(&self) -> &'static str {
        match self {
            Language::Cpp => {
                "// C++ Code\n#include <iostream>\nusing namespace std;\n\nint main() {\n    // Write your code here\n    \n    return 0;\n}"
            }
            Language::Java => {
                "// Java Code\npublic class Main {\n    public static void main(String[] args) {\n        // Write your code here\n        \n    }\n}"
            }
            Language::Python => "# Python Code\n# Write your code here\n",
            Language::C => {
                "// C Code\n#include <stdio.h>\n\nint main() {\n    // Write your code here\n    \n    return 0;\n}"
            }
        }
    }
}

impl FromStr for Language {
    type Err = JudgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .into_iter()
            .find(|lang| lang.id() == s)
            .ok_or_else(|| JudgeError::UnsupportedLanguage(s.to_string()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}
