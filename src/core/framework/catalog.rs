use super::{
    FeatureFlags, Framework, FrameworkCategory, FrameworkId, PackageManager, StackDefinition,
    StackPreset,
};

const NODE_TOOLS: &[&str] = &["node", "npm"];

fn stack(
    description: &'static str,
    dependencies: &[&'static str],
    dev_dependencies: &[&'static str],
) -> StackDefinition {
    StackDefinition {
        description,
        dependencies: dependencies.to_vec(),
        dev_dependencies: dev_dependencies.to_vec(),
    }
}

fn install(
    npm: &'static str,
    yarn: &'static str,
    pnpm: &'static str,
    bun: &'static str,
) -> [(PackageManager, &'static str); 4] {
    [
        (PackageManager::Npm, npm),
        (PackageManager::Yarn, yarn),
        (PackageManager::Pnpm, pnpm),
        (PackageManager::Bun, bun),
    ]
}

fn stacks(
    minimal: StackDefinition,
    standard: StackDefinition,
    full: StackDefinition,
) -> [(StackPreset, StackDefinition); 3] {
    [
        (StackPreset::Minimal, minimal),
        (StackPreset::Standard, standard),
        (StackPreset::Full, full),
    ]
}

/// Build the static definition for one framework.
pub(super) fn definition(id: FrameworkId) -> Framework {
    match id {
        FrameworkId::Nextjs => Framework {
            id,
            name: "Next.js",
            description: "The React Framework for the Web",
            category: FrameworkCategory::Nodejs,
            website: "https://nextjs.org",
            install: install(
                "npx create-next-app@latest",
                "yarn create next-app",
                "pnpm create next-app",
                "bunx create-next-app",
            ),
            flags: FeatureFlags {
                typescript: Some("--ts"),
                eslint: Some("--eslint"),
                tailwind: Some("--tailwind"),
                src_dir: Some("--src-dir"),
            },
            stacks: stacks(
                stack("Just the framework", &[], &[]),
                stack(
                    "Framework + formatting",
                    &[],
                    &["prettier", "prettier-plugin-tailwindcss"],
                ),
                stack(
                    "Standard + validation, testing and git hooks",
                    &["zod"],
                    &["vitest", "@testing-library/react", "husky", "lint-staged"],
                ),
            ),
            required_tools: NODE_TOOLS.to_vec(),
        },
        FrameworkId::Nuxt => Framework {
            id,
            name: "Nuxt",
            description: "The Intuitive Vue Framework",
            category: FrameworkCategory::Nodejs,
            website: "https://nuxt.com",
            install: install(
                "npx nuxi@latest init",
                "yarn dlx nuxi@latest init",
                "pnpm dlx nuxi@latest init",
                "bunx nuxi@latest init",
            ),
            flags: FeatureFlags::default(),
            stacks: stacks(
                stack("Just the framework", &[], &[]),
                stack(
                    "Framework + Tailwind + ESLint",
                    &[],
                    &["@nuxtjs/tailwindcss", "@nuxtjs/eslint-config-typescript"],
                ),
                stack(
                    "Standard + Pinia, validation and testing",
                    &["@pinia/nuxt", "zod"],
                    &["vitest", "@vue/test-utils", "husky"],
                ),
            ),
            required_tools: NODE_TOOLS.to_vec(),
        },
        FrameworkId::Astro => Framework {
            id,
            name: "Astro",
            description: "The web framework for content-driven websites",
            category: FrameworkCategory::Nodejs,
            website: "https://astro.build",
            install: install(
                "npm create astro@latest",
                "yarn create astro",
                "pnpm create astro@latest",
                "bun create astro@latest",
            ),
            flags: FeatureFlags {
                typescript: Some("--template with-typescript"),
                tailwind: Some("--add tailwind"),
                ..FeatureFlags::default()
            },
            stacks: stacks(
                stack("Just the framework", &[], &[]),
                stack(
                    "Framework + MDX + Tailwind",
                    &["@astrojs/mdx"],
                    &["@astrojs/tailwind", "prettier-plugin-astro"],
                ),
                stack(
                    "Standard + React islands and testing",
                    &["@astrojs/react", "react", "react-dom"],
                    &["vitest", "husky"],
                ),
            ),
            required_tools: NODE_TOOLS.to_vec(),
        },
        FrameworkId::Sveltekit => Framework {
            id,
            name: "SvelteKit",
            description: "Web development, streamlined",
            category: FrameworkCategory::Nodejs,
            website: "https://kit.svelte.dev",
            install: install(
                "npx sv create",
                "yarn create svelte",
                "pnpm create svelte",
                "bunx sv create",
            ),
            flags: FeatureFlags::default(),
            stacks: stacks(
                stack("Just the framework", &[], &[]),
                stack(
                    "Framework + Tailwind",
                    &[],
                    &["tailwindcss", "postcss", "autoprefixer"],
                ),
                stack(
                    "Standard + Drizzle, validation and testing",
                    &["drizzle-orm", "zod"],
                    &["drizzle-kit", "vitest", "@testing-library/svelte"],
                ),
            ),
            required_tools: NODE_TOOLS.to_vec(),
        },
        FrameworkId::Vue => Framework {
            id,
            name: "Vue",
            description: "The Progressive JavaScript Framework",
            category: FrameworkCategory::Nodejs,
            website: "https://vuejs.org",
            install: install(
                "npm create vue@latest",
                "yarn create vue",
                "pnpm create vue",
                "bun create vue@latest",
            ),
            flags: FeatureFlags::default(),
            stacks: stacks(
                stack("Just the framework", &[], &[]),
                stack(
                    "Framework + Router + Pinia + Tailwind",
                    &["vue-router", "pinia"],
                    &["tailwindcss"],
                ),
                stack(
                    "Standard + validation, HTTP client and testing",
                    &["zod", "axios"],
                    &["vitest", "@vue/test-utils", "husky"],
                ),
            ),
            required_tools: NODE_TOOLS.to_vec(),
        },
        FrameworkId::Remix => Framework {
            id,
            name: "Remix",
            description: "Full stack web framework",
            category: FrameworkCategory::Nodejs,
            website: "https://remix.run",
            install: install(
                "npx create-remix@latest",
                "yarn create remix",
                "pnpm create remix@latest",
                "bunx create-remix@latest",
            ),
            flags: FeatureFlags::default(),
            stacks: stacks(
                stack("Just the framework", &[], &[]),
                stack(
                    "Framework + Tailwind",
                    &[],
                    &["tailwindcss", "postcss", "autoprefixer"],
                ),
                stack(
                    "Standard + Prisma, validation and testing",
                    &["@prisma/client", "zod"],
                    &["prisma", "vitest", "@testing-library/react"],
                ),
            ),
            required_tools: NODE_TOOLS.to_vec(),
        },
        FrameworkId::Laravel => Framework {
            id,
            name: "Laravel",
            description: "The PHP Framework for Web Artisans",
            category: FrameworkCategory::Php,
            website: "https://laravel.com",
            install: install(
                "composer create-project laravel/laravel",
                "composer create-project laravel/laravel",
                "composer create-project laravel/laravel",
                "composer create-project laravel/laravel",
            ),
            flags: FeatureFlags::default(),
            stacks: stacks(
                stack("Just Laravel", &[], &[]),
                stack("Laravel + Breeze + Inertia Vue", &[], &[]),
                stack("Standard + Pest + Telescope", &[], &[]),
            ),
            required_tools: vec!["php", "composer"],
        },
    }
}
