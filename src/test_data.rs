#[cfg(test)]
pub const POST_DATA: &str = r#"+++
title = "What I learned after 20+ years"
description = "How to be a great software engineer?"
publishDate = 2022-04-02T12:05:00
updatedDate = "2022-05-01"
tags = ["Career", "software", "career"]
language = "en"
+++

How to be a great software engineer?

Someone asked me this question today and I didn't have an answer. After thinking for a while, I came up with a list of what I try to do myself.

<!-- more -->

## Non technical

### Have a honest image of yourself
"#;

#[cfg(test)]
pub const MICROPOST_DATA: &str = r#"+++
publishDate = "2025-06-01 09:30"
likes = 12
retweets = "1.2k"
tags = ["Rust"]
+++

Rust got a new release today, time to update the toolchain.
"#;

#[cfg(test)]
pub const YAML_POST_DATA: &str = r#"---
title: Shipping a blog with Astro
description: Notes from moving the site to content collections
publishDate: 2025-01-15
tags:
  - Astro
  - WebDev
  - astro
  - TypeScript
draft: false
heroImage:
  src: ./hero.jpg
  alt: Rocket on a launch pad
  inferSize: true
---

Astro makes it easy to keep posts as plain markdown files.
"#;
