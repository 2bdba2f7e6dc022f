//! The built-in "R from zero" curriculum.

use crate::error::Error;
use crate::model::{Catalog, LessonDraft, LessonId};

/// Lessons 17 to 19 draw plots, so they open on the graphics tab.
pub const VISUALIZATION_LESSONS: std::ops::RangeInclusive<u32> = 17..=19;

struct Row {
    title: &'static str,
    module: &'static str,
    scenario: &'static str,
    task: &'static str,
    hint: &'static str,
    default_code: &'static str,
    keywords: &'static [&'static str],
}

const ROWS: &[Row] = &[
    Row {
        title: "Variables",
        module: "Getting started",
        scenario: "R prefers `<-` as the assignment operator. A variable can hold any kind of data.",
        task: "Create `name <- \"R-Master\"` and `version <- 4.2`, then type each variable name on its own line to print it.",
        hint: "name <- \"R-Master\"\nversion <- 4.2\nname\nversion",
        default_code: "name <- \"R-Master\"\nversion <- 4.2\nname\nversion",
        keywords: &["<-", "name", "version"],
    },
    Row {
        title: "Data types",
        module: "Data structures",
        scenario: "R has five atomic types: numeric, integer, complex, logical and character.",
        task: "Use `class()` to inspect the type of `3.14`, `TRUE` and `\"Hello\"`.",
        hint: "class(3.14)\nclass(TRUE)\nclass(\"Hello\")",
        default_code: "class(3.14)\nclass(TRUE)\nclass(\"Hello\")",
        keywords: &["class", "3.14", "TRUE", "Hello"],
    },
    Row {
        title: "Arithmetic",
        module: "Operators",
        scenario: "Besides the usual operators R has modulo `%%` and integer division `%/%`.",
        task: "Compute the remainder and the integer quotient of `10` divided by `3`.",
        hint: "10 %% 3\n10 %/% 3",
        default_code: "10 %% 3\n10 %/% 3",
        keywords: &["%%", "%/%"],
    },
    Row {
        title: "Vectors",
        module: "Core structures",
        scenario: "The vector is R's most basic structure. Combine values with `c()` and build sequences with `seq()` or `:`.",
        task: "Create a vector `v` holding 1 to 10 and print its length with `length(v)`.",
        hint: "v <- 1:10\nlength(v)",
        default_code: "v <- 1:10\nlength(v)",
        keywords: &["1:10", "length"],
    },
    Row {
        title: "Lists",
        module: "Core structures",
        scenario: "A list can hold elements of different types, even other lists.",
        task: "Create a list `my_list` holding a number, a string and a logical value.",
        hint: "my_list <- list(1, \"A\", TRUE)\nmy_list",
        default_code: "my_list <- list(1, \"A\", TRUE)\nmy_list",
        keywords: &["list"],
    },
    Row {
        title: "Matrices",
        module: "Core structures",
        scenario: "A matrix is two-dimensional data of a single type. `nrow` and `ncol` set its shape.",
        task: "Create a matrix with 2 rows and 3 columns holding the numbers 1 to 6.",
        hint: "matrix(1:6, nrow=2, ncol=3)",
        default_code: "matrix(1:6, nrow=2, ncol=3)",
        keywords: &["matrix", "nrow", "ncol"],
    },
    Row {
        title: "Arrays",
        module: "Core structures",
        scenario: "Arrays generalise matrices to any number of dimensions.",
        task: "Use `array()` to create a 3x3x2 array.",
        hint: "array(1:18, dim=c(3,3,2))",
        default_code: "array(1:18, dim=c(3,3,2))",
        keywords: &["array", "dim"],
    },
    Row {
        title: "Factors",
        module: "Core structures",
        scenario: "Factors store categorical data and show up in most statistical models.",
        task: "Turn `c(\"Male\", \"Female\", \"Male\")` into a factor and list its `levels()`.",
        hint: "f <- factor(c(\"Male\", \"Female\", \"Male\"))\nlevels(f)",
        default_code: "f <- factor(c(\"Male\", \"Female\", \"Male\"))\nlevels(f)",
        keywords: &["factor", "levels"],
    },
    Row {
        title: "Data frames",
        module: "Core structures",
        scenario: "The data frame is R's everyday table. Each column may have its own type.",
        task: "Create a data frame with a name column and an age column.",
        hint: "df <- data.frame(name=c(\"Alice\", \"Bob\"), age=c(25, 30))\ndf",
        default_code: "df <- data.frame(name=c(\"Alice\", \"Bob\"), age=c(25, 30))\ndf",
        keywords: &["data.frame"],
    },
    Row {
        title: "If / else",
        module: "Control flow",
        scenario: "Use `if` and `else` to choose which code runs.",
        task: "Print \"Positive\" when `x > 0`.",
        hint: "x <- 5\nif(x > 0) { print(\"Positive\") }",
        default_code: "x <- 5\nif(x > 0) {\n  print(\"Positive\")\n}",
        keywords: &["if", "print"],
    },
    Row {
        title: "Switch",
        module: "Control flow",
        scenario: "With many branches `switch` reads better than a chain of `if`s.",
        task: "Return the colour that matches the value of `index`.",
        hint: "index <- 2\nswitch(index, \"red\", \"green\", \"blue\")",
        default_code: "index <- 2\nswitch(index, \"red\", \"green\", \"blue\")",
        keywords: &["switch"],
    },
    Row {
        title: "For loops",
        module: "Control flow",
        scenario: "A `for` loop visits every element of a sequence.",
        task: "Print the squares of 1 to 5 with a loop.",
        hint: "for(i in 1:5) { print(i^2) }",
        default_code: "for(i in 1:5) {\n  print(i^2)\n}",
        keywords: &["for", "in", "print"],
    },
    Row {
        title: "While loops",
        module: "Control flow",
        scenario: "A `while` loop repeats as long as its condition holds.",
        task: "While `cnt < 5`, print `cnt` and increment it.",
        hint: "cnt <- 0\nwhile(cnt < 5) { print(cnt); cnt <- cnt + 1 }",
        default_code: "cnt <- 0\nwhile(cnt < 5) {\n  print(cnt)\n  cnt <- cnt + 1\n}",
        keywords: &["while"],
    },
    Row {
        title: "Functions",
        module: "Functional programming",
        scenario: "Define your own logic with the `function` keyword.",
        task: "Define a function `add_nums` that returns the sum of two numbers.",
        hint: "add_nums <- function(a, b) { return(a + b) }\nadd_nums(5, 10)",
        default_code: "add_nums <- function(a, b) {\n  return(a + b)\n}\nadd_nums(5, 10)",
        keywords: &["function", "return"],
    },
    Row {
        title: "Strings",
        module: "Data wrangling",
        scenario: "R ships string helpers such as `paste` and `toupper`.",
        task: "Upper-case \"hello\" and join it with \"world\".",
        hint: "paste(toupper(\"hello\"), \"world\")",
        default_code: "paste(toupper(\"hello\"), \"world\")",
        keywords: &["toupper", "paste"],
    },
    Row {
        title: "Descriptive statistics",
        module: "Statistics",
        scenario: "Summarise a data set in one line.",
        task: "Compute the mean and the median of `c(1, 2, 3, 4, 100)`.",
        hint: "v <- c(1, 2, 3, 4, 100)\nmean(v)\nmedian(v)",
        default_code: "v <- c(1, 2, 3, 4, 100)\nmean(v)\nmedian(v)",
        keywords: &["mean", "median"],
    },
    Row {
        title: "Basic plots",
        module: "Visualization",
        scenario: "`plot()` draws the simplest charts. The graphics tab shows what the engine draws.",
        task: "Plot the points 1 to 10.",
        hint: "plot(1:10)",
        default_code: "plot(1:10, main=\"My Plot\", col=\"red\")",
        keywords: &["plot"],
    },
    Row {
        title: "Bar charts",
        module: "Visualization",
        scenario: "Bar charts show how often each category occurs.",
        task: "Draw a bar chart of a few numbers with `barplot()`.",
        hint: "barplot(c(7, 12, 28, 3, 41))",
        default_code: "barplot(c(7, 12, 28, 3, 41), names.arg=c(\"A\",\"B\",\"C\",\"D\",\"E\"))",
        keywords: &["barplot"],
    },
    Row {
        title: "Histograms",
        module: "Visualization",
        scenario: "Histograms show how a continuous variable is distributed.",
        task: "Draw a histogram of 100 standard normal draws, `rnorm(100)`.",
        hint: "hist(rnorm(100))",
        default_code: "hist(rnorm(100), col=\"lightblue\")",
        keywords: &["hist", "rnorm"],
    },
    Row {
        title: "Reshaping",
        module: "Advanced wrangling",
        scenario: "Combine data sets or change their shape.",
        task: "Join two vectors by row with `rbind()` and by column with `cbind()`.",
        hint: "v1 <- 1:3; v2 <- 4:6\nrbind(v1, v2)\ncbind(v1, v2)",
        default_code: "v1 <- 1:3\nv2 <- 4:6\nrbind(v1, v2)\ncbind(v1, v2)",
        keywords: &["rbind", "cbind"],
    },
];

/// Build the built-in curriculum.
///
/// # Errors
///
/// Returns `Error` if a row fails lesson validation or the ids are not sequential.
pub fn r_basics() -> Result<Catalog, Error> {
    let mut lessons = Vec::with_capacity(ROWS.len());
    for (id, row) in (1_u32..).zip(ROWS) {
        let lesson = LessonDraft {
            title: row.title.to_string(),
            module: row.module.to_string(),
            scenario: row.scenario.to_string(),
            task: row.task.to_string(),
            hint: row.hint.to_string(),
            default_code: row.default_code.to_string(),
            expected_keywords: row.keywords.iter().map(|kw| (*kw).to_string()).collect(),
        }
        .validate(LessonId::new(id))?;
        lessons.push(lesson);
    }
    Ok(Catalog::new(lessons)?.with_visualization_range(VISUALIZATION_LESSONS))
}
