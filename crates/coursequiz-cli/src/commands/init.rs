//! The `coursequiz init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("coursequiz.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("content/banks")?;
    std::fs::create_dir_all("content/pages")?;
    write_if_missing(Path::new("content/banks/example.toml"), EXAMPLE_BANK)?;
    write_if_missing(Path::new("content/pages/example.toml"), EXAMPLE_PAGE)?;

    println!("\nNext steps:");
    println!("  1. Run: coursequiz validate --path content");
    println!("  2. Run: coursequiz take --bank content/banks/example.toml");
    println!("  3. Run: coursequiz study --page content/pages/example.toml");

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
    } else {
        std::fs::write(path, contents)?;
        println!("Created {}", path.display());
    }
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# coursequiz configuration

default_question_count = 10
pass_mark = 80
shuffle = true
output_dir = "./coursequiz-results"
save_reports = false

# time_limit_secs = 2700

[difficulty_weights]
basic = 40
intermediate = 45
advanced = 15
"#;

const EXAMPLE_BANK: &str = r#"[bank]
id = "example"
name = "Example Question Bank"
description = "A few questions to get started"

[[questions]]
id = 1
prompt = "What is the unit of electrical resistance?"
options = ["Volt", "Ampere", "Ohm", "Watt"]
correct_index = 2
explanation = "Resistance is measured in ohms."
section = "1.1"
difficulty = "basic"
topic = "Units"

[[questions]]
id = 2
prompt = "Which formula gives power from voltage and current?"
options = ["P = V / I", "P = V x I", "P = I / V", "P = V + I"]
correct_index = 1
explanation = "Power is voltage multiplied by current."
section = "1.1"
difficulty = "intermediate"
topic = "Power"

[[questions]]
id = 3
prompt = "A 230 V heater draws 10 A. What is its power?"
options = ["23 W", "230 W", "2.3 kW", "23 kW"]
correct_index = 2
explanation = "230 V x 10 A = 2300 W = 2.3 kW."
section = "1.2"
difficulty = "advanced"
topic = "Power"
"#;

const EXAMPLE_PAGE: &str = r#"outcomes = ["Name the unit of resistance", "Calculate power from voltage and current"]

[page]
id = "example-page"
title = "Electrical Units"
description = "Resistance, current and power"

[[summary]]
title = "In 30 seconds"
points = ["Resistance is measured in ohms", "Power is voltage times current"]

[[sections]]
number = 1
title = "Resistance"
paragraphs = ["Resistance opposes the flow of current and is measured in ohms."]
check = "units-check"

[[checks]]
id = "units-check"
prompt = "What is the unit of resistance?"
options = ["Ohm", "Volt"]
correct_index = 0
explanation = "Resistance is measured in ohms."

[[faqs]]
question = "Is a kilowatt the same as a kilowatt-hour?"
answer = "No. A kilowatt is power; a kilowatt-hour is energy."

[quiz]
title = "Knowledge Check"

[[quiz.questions]]
id = 1
prompt = "P = V x I. What is P for 12 V and 2 A?"
options = ["6 W", "14 W", "24 W"]
correct_index = 2
explanation = "12 V x 2 A = 24 W."
"#;
