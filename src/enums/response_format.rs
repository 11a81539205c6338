/// Which branch of the normalization chain produced the issues. The more
/// structured the input looked, the more we trust what we parsed out of it.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ResponseFormat {
    StructuredJson,
    TemplatedBlocks,
    ItemizedProse,
    FreeProse,
    Unparseable,
}

impl ResponseFormat {
    pub fn parse_confidence(&self) -> f64 {
        match self {
            ResponseFormat::StructuredJson => 0.95,
            ResponseFormat::TemplatedBlocks => 0.75,
            ResponseFormat::ItemizedProse => 0.55,
            ResponseFormat::FreeProse => 0.3,
            ResponseFormat::Unparseable => 0.0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ResponseFormat::StructuredJson => "structured-json",
            ResponseFormat::TemplatedBlocks => "templated-blocks",
            ResponseFormat::ItemizedProse => "itemized-prose",
            ResponseFormat::FreeProse => "free-prose",
            ResponseFormat::Unparseable => "unparseable",
        }
    }
}
