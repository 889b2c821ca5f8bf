//! Built-in canned answers, in match order.

/// Reserved keyword naming the fallback answer.
pub const DEFAULT_KEY: &str = "default";

pub const CANNED_ANSWERS: &[(&str, &str)] = &[
    (
        "deduction",
        "You get the larger of your standard deduction and your itemized total. \
         Itemized expenses are student loan interest, charitable contributions and \
         medical expenses.",
    ),
    (
        "credit",
        "Two credits are available: 25,000 per dependent (up to 150,000) if you \
         claim the child tax credit, and an education credit equal to your student \
         loan interest (up to 50,000).",
    ),
    (
        "refund",
        "Your estimated refund is the tax already withheld minus your tax after \
         credits. A negative figure means you owe the difference.",
    ),
    (
        "bracket",
        "Income is taxed in bands: nothing on the first 3,00,000, then 5%, 10%, \
         15% and 20% on each following 3,00,000, and 30% above 15,00,000.",
    ),
    (
        "withhold",
        "Enter the total tax already deducted from your pay during the year. It is \
         compared against your final tax to work out the refund.",
    ),
    (
        "dependent",
        "Enter the number of people you support. Dependents only count toward a \
         credit when you also tick the child tax credit box.",
    ),
    (
        "student loan",
        "Student loan interest is added to your itemized deductions, and it also \
         sets the education credit when you request it.",
    ),
    (
        "filing status",
        "Choose single, married filing jointly, married filing separately, head of \
         household, or qualifying widow(er). It decides your standard deduction.",
    ),
    (
        "deadline",
        "Returns are due by the end of July for most individual filers. Check the \
         official calendar for extensions.",
    ),
    (
        "hello",
        "Hello! Ask me about deductions, credits, brackets, withholding or your refund.",
    ),
    (
        DEFAULT_KEY,
        "Sorry, I don't have an answer for that. Try asking about deductions, \
         credits, tax brackets or your refund.",
    ),
];
