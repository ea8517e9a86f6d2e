use std::collections::HashSet;

use serde::Deserialize;

use crate::entry::{Entry, Item};
use crate::error::GenError;
use crate::generate::Extension;

/// Declarative inputs for one regeneration: the dispatch lists and tracked extensions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Tables {
    #[serde(default)]
    pub instance: Vec<Item>,
    #[serde(default)]
    pub device: Vec<Item>,
    #[serde(default)]
    pub extensions: Vec<Extension>,
}

impl Tables {
    /// Load tables from JSON. `null` list elements are separators.
    pub fn from_json(text: &str) -> Result<Self, GenError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject lists that would generate the same field twice under the same guard
    pub fn validate(&self) -> Result<(), GenError> {
        check_unique_aliases(&self.instance, "instance")?;
        check_unique_aliases(&self.device, "device")?;

        let mut seen = HashSet::new();
        for extension in &self.extensions {
            if !seen.insert(extension.name()) {
                return Err(GenError::DuplicateExtension {
                    name: extension.name().to_string(),
                });
            }
        }
        Ok(())
    }

    /// The dispatch lists shipped with the generator
    pub fn builtin() -> Self {
        Self {
            instance: instance_functions(),
            device: device_functions(),
            extensions: tracked_extensions(),
        }
    }
}

/// Entries sharing an alias are fine under different conditions, e.g. a
/// Win32 and a `!defined(VK_USE_PLATFORM_WIN32_KHR)` variant of one field.
fn check_unique_aliases(items: &[Item], list: &'static str) -> Result<(), GenError> {
    let mut seen = HashSet::new();
    for entry in items.iter().filter_map(Item::entry) {
        if !seen.insert((entry.alias(), entry.condition())) {
            return Err(GenError::DuplicateAlias {
                alias: entry.alias().to_string(),
                list,
            });
        }
    }
    Ok(())
}

fn f(name: &str) -> Item {
    Entry::new(name).into()
}

fn guarded(name: &str, requires: &[&str]) -> Item {
    Entry::new(name).with_requires(requires.iter().copied()).into()
}

fn promoted(name: &str, alias: &str, requires: &[&str]) -> Item {
    Entry::new(name)
        .with_alias(alias)
        .with_requires(requires.iter().copied())
        .into()
}

const WIN32: &str = "VK_USE_PLATFORM_WIN32_KHR";
const NOT_WIN32: &str = "!defined(VK_USE_PLATFORM_WIN32_KHR)";
const ANDROID: &str = "VK_USE_PLATFORM_ANDROID_KHR";
const DISPLAY: &str = "VK_USE_PLATFORM_DISPLAY_KHR";
const XRANDR: &str = "VK_USE_PLATFORM_XLIB_XRANDR_EXT";

fn instance_functions() -> Vec<Item> {
    vec![
        f("vkDestroyInstance"),
        f("vkGetDeviceProcAddr"),
        f("vkCreateDevice"),
        f("vkDestroySurfaceKHR"),
        Item::Separator,
        f("vkCreateDebugReportCallbackEXT"),
        f("vkDestroyDebugReportCallbackEXT"),
        Item::Separator,
        f("vkEnumeratePhysicalDevices"),
        f("vkGetPhysicalDeviceProperties"),
        f("vkGetPhysicalDeviceProperties2"),
        f("vkGetPhysicalDeviceFeatures2"),
        f("vkGetPhysicalDeviceMemoryProperties"),
        f("vkGetPhysicalDeviceQueueFamilyProperties"),
        f("vkGetPhysicalDeviceSurfaceCapabilitiesKHR"),
        f("vkGetPhysicalDeviceSurfaceFormatsKHR"),
        f("vkGetPhysicalDeviceSurfacePresentModesKHR"),
        f("vkGetPhysicalDeviceSurfaceSupportKHR"),
        f("vkGetPhysicalDeviceFormatProperties"),
        f("vkEnumerateDeviceExtensionProperties"),
        f("vkGetPhysicalDeviceImageFormatProperties2"),
        Item::Separator,
        guarded("vkCreateDisplayPlaneSurfaceKHR", &[DISPLAY]),
        guarded("vkGetDisplayPlaneCapabilitiesKHR", &[DISPLAY]),
        guarded("vkGetPhysicalDeviceDisplayPropertiesKHR", &[DISPLAY]),
        guarded("vkGetPhysicalDeviceDisplayPlanePropertiesKHR", &[DISPLAY]),
        guarded("vkGetDisplayModePropertiesKHR", &[DISPLAY]),
        guarded("vkReleaseDisplayEXT", &[DISPLAY]),
        Item::Separator,
        guarded("vkCreateXcbSurfaceKHR", &["VK_USE_PLATFORM_XCB_KHR"]),
        Item::Separator,
        guarded("vkCreateWaylandSurfaceKHR", &["VK_USE_PLATFORM_WAYLAND_KHR"]),
        Item::Separator,
        guarded(
            "vkAcquireDrmDisplayEXT",
            &["VK_USE_PLATFORM_WAYLAND_KHR", "VK_EXT_acquire_drm_display"],
        ),
        guarded(
            "vkGetDrmDisplayEXT",
            &["VK_USE_PLATFORM_WAYLAND_KHR", "VK_EXT_acquire_drm_display"],
        ),
        Item::Separator,
        guarded("vkGetRandROutputDisplayEXT", &[XRANDR]),
        guarded("vkAcquireXlibDisplayEXT", &[XRANDR]),
        Item::Separator,
        guarded("vkCreateAndroidSurfaceKHR", &[ANDROID]),
        Item::Separator,
        guarded("vkCreateWin32SurfaceKHR", &[WIN32]),
    ]
}

fn device_functions() -> Vec<Item> {
    vec![
        f("vkDestroyDevice"),
        f("vkDeviceWaitIdle"),
        f("vkAllocateMemory"),
        f("vkFreeMemory"),
        f("vkMapMemory"),
        f("vkUnmapMemory"),
        Item::Separator,
        f("vkCreateBuffer"),
        f("vkDestroyBuffer"),
        f("vkBindBufferMemory"),
        Item::Separator,
        f("vkCreateImage"),
        f("vkDestroyImage"),
        f("vkBindImageMemory"),
        Item::Separator,
        f("vkGetBufferMemoryRequirements"),
        f("vkFlushMappedMemoryRanges"),
        f("vkGetImageMemoryRequirements"),
        promoted("vkGetImageMemoryRequirements2KHR", "vkGetImageMemoryRequirements2", &[]),
        f("vkGetImageSubresourceLayout"),
        Item::Separator,
        f("vkCreateImageView"),
        f("vkDestroyImageView"),
        Item::Separator,
        f("vkCreateSampler"),
        f("vkDestroySampler"),
        Item::Separator,
        f("vkCreateShaderModule"),
        f("vkDestroyShaderModule"),
        Item::Separator,
        f("vkCreateCommandPool"),
        f("vkDestroyCommandPool"),
        Item::Separator,
        f("vkAllocateCommandBuffers"),
        f("vkBeginCommandBuffer"),
        f("vkCmdPipelineBarrier"),
        f("vkCmdBeginRenderPass"),
        f("vkCmdSetScissor"),
        f("vkCmdSetViewport"),
        f("vkCmdClearColorImage"),
        f("vkCmdEndRenderPass"),
        f("vkCmdBindDescriptorSets"),
        f("vkCmdBindPipeline"),
        f("vkCmdBindVertexBuffers"),
        f("vkCmdBindIndexBuffer"),
        f("vkCmdDraw"),
        f("vkCmdDrawIndexed"),
        f("vkCmdDispatch"),
        f("vkCmdCopyBuffer"),
        f("vkCmdCopyBufferToImage"),
        f("vkCmdCopyImage"),
        f("vkCmdCopyImageToBuffer"),
        f("vkEndCommandBuffer"),
        f("vkFreeCommandBuffers"),
        Item::Separator,
        f("vkCreateRenderPass"),
        f("vkDestroyRenderPass"),
        Item::Separator,
        f("vkCreateFramebuffer"),
        f("vkDestroyFramebuffer"),
        Item::Separator,
        f("vkCreatePipelineCache"),
        f("vkDestroyPipelineCache"),
        Item::Separator,
        f("vkResetDescriptorPool"),
        f("vkCreateDescriptorPool"),
        f("vkDestroyDescriptorPool"),
        Item::Separator,
        f("vkAllocateDescriptorSets"),
        f("vkFreeDescriptorSets"),
        Item::Separator,
        f("vkCreateComputePipelines"),
        f("vkCreateGraphicsPipelines"),
        f("vkDestroyPipeline"),
        Item::Separator,
        f("vkCreatePipelineLayout"),
        f("vkDestroyPipelineLayout"),
        Item::Separator,
        f("vkCreateDescriptorSetLayout"),
        f("vkUpdateDescriptorSets"),
        f("vkDestroyDescriptorSetLayout"),
        Item::Separator,
        f("vkGetDeviceQueue"),
        f("vkQueueSubmit"),
        f("vkQueueWaitIdle"),
        Item::Separator,
        f("vkCreateSemaphore"),
        promoted("vkSignalSemaphoreKHR", "vkSignalSemaphore", &["VK_KHR_timeline_semaphore"]),
        f("vkDestroySemaphore"),
        Item::Separator,
        f("vkCreateFence"),
        f("vkWaitForFences"),
        f("vkGetFenceStatus"),
        f("vkDestroyFence"),
        f("vkResetFences"),
        Item::Separator,
        f("vkCreateSwapchainKHR"),
        f("vkDestroySwapchainKHR"),
        f("vkGetSwapchainImagesKHR"),
        f("vkAcquireNextImageKHR"),
        f("vkQueuePresentKHR"),
        Item::Separator,
        guarded("vkGetMemoryWin32HandleKHR", &[WIN32]),
        guarded("vkImportSemaphoreWin32HandleKHR", &[WIN32]),
        guarded("vkImportFenceWin32HandleKHR", &[WIN32]),
        guarded("vkGetMemoryFdKHR", &[NOT_WIN32]),
        Item::Separator,
        guarded("vkImportSemaphoreFdKHR", &[NOT_WIN32]),
        guarded("vkGetSemaphoreFdKHR", &[NOT_WIN32]),
        Item::Separator,
        guarded("vkImportFenceFdKHR", &[NOT_WIN32]),
        guarded("vkGetFenceFdKHR", &[NOT_WIN32]),
        guarded("vkGetMemoryAndroidHardwareBufferANDROID", &[ANDROID]),
        guarded("vkGetAndroidHardwareBufferPropertiesANDROID", &[ANDROID]),
        Item::Separator,
        f("vkGetPastPresentationTimingGOOGLE"),
    ]
}

fn tracked_extensions() -> Vec<Extension> {
    ["VK_GOOGLE_display_timing", "VK_EXT_global_priority", "VK_EXT_robustness2"]
        .into_iter()
        .map(Extension::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_validate() {
        Tables::builtin().validate().unwrap();
    }

    #[test]
    fn test_duplicate_alias_rejected() {
        let tables = Tables {
            device: vec![
                promoted("vkWaitSemaphores", "vkWaitSemaphores", &["VK_KHR_timeline_semaphore"]),
                promoted("vkWaitSemaphoresKHR", "vkWaitSemaphores", &["VK_KHR_timeline_semaphore"]),
            ],
            ..Tables::default()
        };

        match tables.validate().unwrap_err() {
            GenError::DuplicateAlias { alias, list } => {
                assert_eq!(alias, "vkWaitSemaphores");
                assert_eq!(list, "device");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_same_alias_under_exclusive_guards_allowed() {
        let tables = Tables {
            device: vec![
                promoted("vkGetMemoryWin32HandleKHR", "getMemoryHandle", &[WIN32]),
                promoted("vkGetMemoryFdKHR", "getMemoryHandle", &[NOT_WIN32]),
            ],
            ..Tables::default()
        };
        tables.validate().unwrap();
    }

    #[test]
    fn test_same_alias_unguarded_twice_rejected() {
        let tables = Tables {
            instance: vec![f("vkCreateDevice"), Item::Separator, f("vkCreateDevice")],
            ..Tables::default()
        };
        assert!(matches!(
            tables.validate(),
            Err(GenError::DuplicateAlias { list: "instance", .. })
        ));
    }

    #[test]
    fn test_same_name_distinct_alias_allowed() {
        let tables = Tables {
            instance: vec![
                f("vkGetPhysicalDeviceProperties2"),
                promoted("vkGetPhysicalDeviceProperties2", "fpGetProperties2", &[]),
            ],
            ..Tables::default()
        };
        tables.validate().unwrap();
    }

    #[test]
    fn test_duplicate_extension_rejected() {
        let tables = Tables {
            extensions: vec![Extension::new("VK_KHR_swapchain"), Extension::new("VK_KHR_swapchain")],
            ..Tables::default()
        };
        assert!(matches!(
            tables.validate(),
            Err(GenError::DuplicateExtension { ref name }) if name == "VK_KHR_swapchain"
        ));
    }

    #[test]
    fn test_from_json() {
        let tables = Tables::from_json(
            r#"{
                "instance": [{"name": "vkDestroyInstance"}],
                "device": [{"name": "vkQueueSubmit"}, null, {"name": "vkCreateSwapchainKHR", "requires": ["VK_KHR_swapchain"]}],
                "extensions": ["VK_KHR_swapchain"]
            }"#,
        )
        .unwrap();

        assert_eq!(tables.instance.len(), 1);
        assert_eq!(tables.device[1], Item::Separator);
        assert_eq!(tables.extensions, vec![Extension::new("VK_KHR_swapchain")]);
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            Tables::from_json(r#"{"device": [{"alias": "x"}]}"#),
            Err(GenError::Tables(_))
        ));
    }
}
