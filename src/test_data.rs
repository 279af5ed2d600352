#[cfg(test)]
pub const BLOG_ENTRY: &str = "[TITLE]: # (Rust pipelines)
[DESCRIPTION]: # (Building a data pipeline in Rust)
[DATE]: # (2024-03-10 09:30:00.000)
[TAGS]: # (rust data)
[AUTHORS]: # (mark)

An overview of the series.

## Why another pipeline

Because the existing ones assume a JVM.
";

#[cfg(test)]
pub const COMMENT_WRAPPED_ENTRY: &str = "<!--

[TITLE]: # (Ingest)

[DATE]: # (2024-03-11 08:00:00.000)

[ORDER]: # (1)

[DRAFT]: # (true)

-->

## Reading the source

Line-oriented readers first.
";

#[cfg(test)]
pub const AUTHOR_ENTRY: &str = "[NAME]: # (Mark)
[AVATAR]: # (/public/mark.png)
";
