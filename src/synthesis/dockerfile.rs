//! Container build recipe per framework

use super::shim::{CONTAINER_SHIM_DIR, NODE_PRELOAD_FILE};
use crate::detection::ProjectReport;
use crate::layout::{ProjectLayout, SHIM_DIR};
use crate::stack::{Framework, JavaBuildTool};

pub const PYTHON_IMAGE: &str = "python:3.11-slim";
pub const MAVEN_IMAGE: &str = "maven:3.9-eclipse-temurin-17";
pub const GRADLE_IMAGE: &str = "gradle:8-jdk17";
pub const JAVA_RUNTIME_IMAGE: &str = "eclipse-temurin:17-jre";

/// Renders the Dockerfile for `report`. The build context is the project root.
pub fn render(report: &ProjectReport, layout: &ProjectLayout) -> String {
    let shim_src = format!("{}/", layout.context_relative(SHIM_DIR));
    let mut lines: Vec<String> = vec!["# Generated by stackup".to_string()];

    match report.framework {
        Framework::Node => {
            lines.extend(node_base(report));
            lines.push(format!("COPY {} {}/", shim_src, CONTAINER_SHIM_DIR));
            lines.push(format!(
                "ENV NODE_OPTIONS=\"--require {}/{}\"",
                CONTAINER_SHIM_DIR, NODE_PRELOAD_FILE
            ));
        }
        Framework::Python | Framework::FastApi | Framework::Flask => {
            lines.push(format!("FROM {}", PYTHON_IMAGE));
            lines.push("WORKDIR /app".to_string());
            lines.push("COPY . .".to_string());
            lines.push(
                "RUN if [ -f requirements.txt ]; then pip install --no-cache-dir -r requirements.txt; \\\n    elif [ -f Pipfile ]; then pip install --no-cache-dir pipenv && pipenv install --system --deploy --skip-lock; \\\n    elif [ -f pyproject.toml ]; then pip install --no-cache-dir .; fi"
                    .to_string(),
            );
            if report.framework == Framework::FastApi {
                lines.push("RUN pip install --no-cache-dir uvicorn".to_string());
            }
            lines.push(format!("COPY {} {}/", shim_src, CONTAINER_SHIM_DIR));
            lines.push(format!("ENV PYTHONPATH={}", CONTAINER_SHIM_DIR));
        }
        Framework::Java => {
            let tool = report.java_build.unwrap_or(JavaBuildTool::Maven);
            lines.extend(java_build_stage(tool));
            lines.push(String::new());
            lines.push(format!("FROM {}", JAVA_RUNTIME_IMAGE));
            lines.push("WORKDIR /app".to_string());
            lines.push("COPY --from=build /workspace/app.jar app.jar".to_string());
        }
        Framework::Unknown => {
            // no package.json to copy ahead of the sources
            lines.push(format!("FROM node:{}-slim", report.node_version));
            lines.push("WORKDIR /app".to_string());
            lines.push("COPY . .".to_string());
            lines.push("RUN if [ -f package.json ]; then npm install; fi".to_string());
        }
    }

    lines.push(format!("EXPOSE {}", report.port));
    lines.push(format!("CMD {}", exec_form(&report.start_command)));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn node_base(report: &ProjectReport) -> Vec<String> {
    vec![
        format!("FROM node:{}-slim", report.node_version),
        "WORKDIR /app".to_string(),
        "COPY package*.json ./".to_string(),
        "RUN npm install".to_string(),
        "COPY . .".to_string(),
    ]
}

fn java_build_stage(tool: JavaBuildTool) -> Vec<String> {
    let (image, build, output) = match tool {
        JavaBuildTool::Maven => (
            MAVEN_IMAGE,
            "RUN mvn -B -q package -DskipTests",
            "target",
        ),
        JavaBuildTool::Gradle => (
            GRADLE_IMAGE,
            "RUN gradle build -x test --no-daemon",
            "build/libs",
        ),
    };
    vec![
        format!("FROM {} AS build", image),
        "WORKDIR /workspace".to_string(),
        "COPY . .".to_string(),
        build.to_string(),
        format!(
            "RUN cp \"$(ls {}/*.jar | grep -v -E '(sources|javadoc|plain)\\.jar$' | head -n 1)\" app.jar",
            output
        ),
    ]
}

/// Exec-form CMD running the start command through a shell.
fn exec_form(command: &str) -> String {
    serde_json::Value::Array(vec![
        "sh".into(),
        "-c".into(),
        command.into(),
    ])
    .to_string()
}
