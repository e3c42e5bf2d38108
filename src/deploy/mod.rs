use crate::utils::error::{BundleError, Result};
use std::path::Path;
use tokio::process::Command;

/// Domain the per-instance development hosts live under.
pub const REMOTE_DOMAIN: &str = "wdevx.yandex.net";

const SVGO_PASSES: usize = 5;

const BIG_DIR: &str = "tmpl/everything/blocks/common-all/services-main/services-main.inline";
const SMALL_DIR: &str = "tmpl/everything/blocks/common-all/services-all/services-all.inline";
const NOT_FOUND_DIR: &str = "tmpl/white/blocks/404/services/services.inline";

/// A development instance like `v25d1`: host part before the first `d`,
/// instance remainder from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    pub dev: String,
    pub suffix: String,
}

impl Instance {
    pub fn parse(value: &str) -> Result<Self> {
        match value.find('d') {
            Some(pos) if pos > 0 => Ok(Self {
                dev: value[..pos].to_string(),
                suffix: value[pos..].to_string(),
            }),
            _ => Err(BundleError::InvalidConfigValueError {
                field: "instance".to_string(),
                value: value.to_string(),
                reason: "Expected an instance like v25d1 or v5d3".to_string(),
            }),
        }
    }

    pub fn host(&self) -> String {
        format!("{}.{}", self.dev, REMOTE_DOMAIN)
    }

    pub fn remote_root(&self) -> String {
        format!("/opt/www/morda-{}{}", self.dev, self.suffix)
    }
}

/// Destination switches parsed from the dash-prefixed flags argument.
/// Characters outside `b`, `s`, `4`, `t` are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendFlags {
    pub big: bool,
    pub small: bool,
    pub not_found: bool,
    pub turkish: bool,
}

impl SendFlags {
    pub fn parse(value: &str) -> Result<Self> {
        let chars = value
            .strip_prefix('-')
            .ok_or_else(|| BundleError::InvalidConfigValueError {
                field: "flags".to_string(),
                value: value.to_string(),
                reason: "Flags must start with a dash, e.g. -bs4t".to_string(),
            })?;

        let mut flags = Self::default();
        for c in chars.chars() {
            match c {
                'b' => flags.big = true,
                's' => flags.small = true,
                '4' => flags.not_found = true,
                't' => flags.turkish = true,
                other => tracing::debug!("Ignoring unknown flag '{}'", other),
            }
        }
        Ok(flags)
    }

    pub fn has_destination(&self) -> bool {
        self.big || self.small || self.not_found
    }
}

/// The three remote template slots an icon can be sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSlot {
    Big,
    Small,
    NotFound,
}

impl IconSlot {
    fn template_dir(&self) -> &'static str {
        match self {
            Self::Big => BIG_DIR,
            Self::Small => SMALL_DIR,
            Self::NotFound => NOT_FOUND_DIR,
        }
    }

    fn remote_file(&self, service: &str, ext: &str, turkish: bool) -> String {
        let tr = if turkish { "_tr" } else { "" };
        match self {
            Self::Big => format!("{}{}.{}", service, tr, ext),
            Self::Small => format!("{}_small{}.{}", service, tr, ext),
            Self::NotFound => format!("service-{}{}.{}", service, tr, ext),
        }
    }

    pub fn remote_path(
        &self,
        instance: &Instance,
        service: &str,
        ext: &str,
        turkish: bool,
    ) -> String {
        format!(
            "{}/{}/{}",
            instance.remote_root(),
            self.template_dir(),
            self.remote_file(service, ext, turkish)
        )
    }

    fn success_message(&self, ext: &str) -> String {
        match self {
            Self::Big => format!("Big {} icon for all sent", ext),
            Self::Small => format!("Small {} icon for all sent", ext),
            Self::NotFound => format!("{} icon for 404 sent", ext),
        }
    }
}

/// One validated send-icon invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendRequest {
    pub file_name: String,
    pub service_name: String,
    pub instance: Instance,
    pub flags: SendFlags,
}

impl SendRequest {
    pub fn new(file_name: &str, service_name: &str, instance: &str, flags: &str) -> Result<Self> {
        Ok(Self {
            file_name: file_name.to_string(),
            service_name: service_name.to_string(),
            instance: Instance::parse(instance)?,
            flags: SendFlags::parse(flags)?,
        })
    }

    /// Extension after the last dot, empty when there is none.
    pub fn extension(&self) -> &str {
        Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
    }

    /// The working copy: a `_tmp_`-prefixed sibling of the input file.
    pub fn tmp_file(&self) -> String {
        let path = Path::new(&self.file_name);
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(&self.file_name);
        match path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            Some(parent) => format!("{}/_tmp_{}", parent.to_string_lossy(), name),
            None => format!("_tmp_{}", name),
        }
    }

    /// Requested slots, in `b`, `s`, `4` order.
    pub fn destinations(&self) -> Vec<IconSlot> {
        let mut slots = Vec::new();
        if self.flags.big {
            slots.push(IconSlot::Big);
        }
        if self.flags.small {
            slots.push(IconSlot::Small);
        }
        if self.flags.not_found {
            slots.push(IconSlot::NotFound);
        }
        slots
    }
}

/// Runs the full send flow. Child-process failures are logged and stop the
/// run without propagating; the process still exits successfully.
pub async fn run(request: &SendRequest) {
    let tmp = request.tmp_file();

    if !run_tool("chmod", &["664", request.file_name.as_str()]).await {
        return;
    }
    if !run_tool("cp", &[request.file_name.as_str(), tmp.as_str()]).await {
        return;
    }

    match request.extension() {
        "svg" => {
            if !optimize_svg(&tmp).await {
                return;
            }
        }
        "png" => {
            if !run_tool("optipng", &[tmp.as_str(), "-o7"]).await {
                return;
            }
        }
        other => {
            tracing::warn!(
                "No optimizer for \"{}\" files, nothing sent for {}",
                other,
                request.file_name
            );
            return;
        }
    }

    if !request.flags.has_destination() {
        tracing::warn!("No destination flags given, nothing sent");
        return;
    }

    send(request, &tmp).await;
}

async fn optimize_svg(tmp: &str) -> bool {
    for pass in 1..=SVGO_PASSES {
        tracing::debug!("svgo pass {}/{}", pass, SVGO_PASSES);
        if !run_tool("svgo", &["-i", tmp, "-o", tmp, "--multipass", "-p", "2"]).await {
            return false;
        }
    }
    true
}

async fn send(request: &SendRequest, tmp: &str) {
    let ext = request.extension();
    for slot in request.destinations() {
        let remote = format!(
            "{}:{}",
            request.instance.host(),
            slot.remote_path(&request.instance, &request.service_name, ext, request.flags.turkish)
        );
        // Slots are independent: a failed copy does not stop the others.
        if run_tool("scp", &[tmp, remote.as_str()]).await {
            tracing::info!("{}", slot.success_message(ext));
        }
    }
}

async fn run_tool(program: &str, args: &[&str]) -> bool {
    let command_line = format!("{} {}", program, args.join(" "));
    tracing::info!("{}", command_line);

    match Command::new(program).args(args).output().await {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            if !stdout.trim().is_empty() {
                tracing::info!("{}", stdout.trim_end());
            }
            let stderr = String::from_utf8_lossy(&output.stderr);
            if !stderr.trim().is_empty() {
                tracing::warn!("{}", stderr.trim_end());
            }

            if output.status.success() {
                true
            } else {
                let err = BundleError::CommandError {
                    command: command_line,
                    message: format!("exited with {}", output.status),
                };
                tracing::error!("{}", err);
                false
            }
        }
        Err(source) => {
            let err = BundleError::CommandError {
                command: command_line,
                message: source.to_string(),
            };
            tracing::error!("{}", err);
            false
        }
    }
}
