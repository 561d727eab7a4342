//! Screenshot capture using Windows Graphics Capture API.
//!
//! `RoInitialize` must have been called on the process before capturing.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context, Result};
use image::RgbaImage;

use windows::core::{h, Interface};
use windows::Foundation::TypedEventHandler;
use windows::Graphics::Capture::{Direct3D11CaptureFramePool, GraphicsCaptureItem};
use windows::Graphics::DirectX::Direct3D11::IDirect3DDevice;
use windows::Graphics::DirectX::DirectXPixelFormat;
use windows::Win32::Foundation::HWND;
use windows::Win32::Graphics::Direct3D::D3D_DRIVER_TYPE_HARDWARE;
use windows::Win32::Graphics::Direct3D11::{
    D3D11CreateDevice, ID3D11Device, ID3D11DeviceContext, ID3D11Resource, ID3D11Texture2D,
    D3D11_CPU_ACCESS_READ, D3D11_CREATE_DEVICE_BGRA_SUPPORT, D3D11_MAPPED_SUBRESOURCE,
    D3D11_MAP_READ, D3D11_SDK_VERSION, D3D11_TEXTURE2D_DESC, D3D11_USAGE_STAGING,
};
use windows::Win32::Graphics::Dxgi::IDXGIDevice;
use windows::Win32::System::WinRT::Direct3D11::{
    CreateDirect3D11DeviceFromDXGIDevice, IDirect3DDxgiInterfaceAccess,
};
use windows::Win32::System::WinRT::Graphics::Capture::IGraphicsCaptureItemInterop;
use windows::Win32::System::WinRT::RoGetActivationFactory;

use super::window::to_hwnd;
use super::{GameWindow, Screenshotter};
use crate::error::AssistantError;

const FRAME_TIMEOUT: Duration = Duration::from_secs(5);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug, Default, Clone, Copy)]
pub struct GraphicsCaptureScreenshotter;

impl Screenshotter for GraphicsCaptureScreenshotter {
    fn capture(&self, window: &GameWindow, path: &Path) -> Result<(), AssistantError> {
        let img = capture_window_image(to_hwnd(window.handle))
            .map_err(|e| AssistantError::ScreenshotFailure(format!("{:#}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        img.save(path)
            .map_err(|e| AssistantError::ScreenshotFailure(e.to_string()))?;

        tracing::info!(
            "Screenshot {}x{} saved to {}",
            img.width(),
            img.height(),
            path.display()
        );
        Ok(())
    }
}

/// Hardware D3D11 device and its immediate context.
struct CaptureDevice {
    device: ID3D11Device,
    context: ID3D11DeviceContext,
}

impl CaptureDevice {
    fn new() -> Result<Self> {
        let mut device = None;
        let mut context = None;
        unsafe {
            D3D11CreateDevice(
                None,
                D3D_DRIVER_TYPE_HARDWARE,
                None,
                D3D11_CREATE_DEVICE_BGRA_SUPPORT,
                None,
                D3D11_SDK_VERSION,
                Some(&mut device),
                None,
                Some(&mut context),
            )?;
        }

        Ok(Self {
            device: device.ok_or_else(|| anyhow!("D3D11CreateDevice returned no device"))?,
            context: context.ok_or_else(|| anyhow!("D3D11CreateDevice returned no context"))?,
        })
    }

    /// WinRT wrapper of the device, as the frame pool expects it.
    fn winrt_device(&self) -> Result<IDirect3DDevice> {
        let dxgi: IDXGIDevice = self.device.cast()?;
        let inspectable = unsafe { CreateDirect3D11DeviceFromDXGIDevice(&dxgi)? };
        inspectable.cast().context("device is not an IDirect3DDevice")
    }

    /// Copies `texture` to a CPU-readable staging texture and converts BGRA to RGBA.
    fn read_texture(&self, texture: &ID3D11Texture2D) -> Result<RgbaImage> {
        let mut desc = D3D11_TEXTURE2D_DESC::default();
        unsafe { texture.GetDesc(&mut desc) };

        let staging_desc = D3D11_TEXTURE2D_DESC {
            MipLevels: 1,
            ArraySize: 1,
            Usage: D3D11_USAGE_STAGING,
            BindFlags: 0,
            CPUAccessFlags: D3D11_CPU_ACCESS_READ.0 as u32,
            MiscFlags: 0,
            ..desc
        };

        let mut staging: Option<ID3D11Texture2D> = None;
        unsafe { self.device.CreateTexture2D(&staging_desc, None, Some(&mut staging))? };
        let staging: ID3D11Resource = staging
            .ok_or_else(|| anyhow!("CreateTexture2D returned no staging texture"))?
            .cast()?;

        let mut mapped = D3D11_MAPPED_SUBRESOURCE::default();
        unsafe {
            self.context
                .CopyResource(&staging, &texture.cast::<ID3D11Resource>()?);
            self.context
                .Map(&staging, 0, D3D11_MAP_READ, 0, Some(&mut mapped))?;
        }

        let width = desc.Width as usize;
        let pitch = mapped.RowPitch as usize;
        let bytes = unsafe {
            std::slice::from_raw_parts(mapped.pData as *const u8, pitch * desc.Height as usize)
        };

        // Rows are padded to RowPitch; keep only the visible pixels
        let mut rgba = Vec::with_capacity(width * desc.Height as usize * 4);
        for row in bytes.chunks_exact(pitch) {
            for px in row[..width * 4].chunks_exact(4) {
                rgba.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
            }
        }

        unsafe { self.context.Unmap(&staging, 0) };

        RgbaImage::from_raw(desc.Width, desc.Height, rgba)
            .ok_or_else(|| anyhow!("mapped texture is smaller than {}x{}", desc.Width, desc.Height))
    }
}

/// Grabs one frame of `hwnd`.
pub fn capture_window_image(hwnd: HWND) -> Result<RgbaImage> {
    let device = CaptureDevice::new()?;
    let item = capture_item_for(hwnd)?;
    let size = item.Size()?;
    tracing::debug!("Capture size: {}x{}", size.Width, size.Height);

    let frame_pool = Direct3D11CaptureFramePool::CreateFreeThreaded(
        &device.winrt_device()?,
        DirectXPixelFormat::B8G8R8A8UIntNormalized,
        1,
        size,
    )?;
    let session = frame_pool.CreateCaptureSession(&item)?;

    let arrived = Arc::new(AtomicBool::new(false));
    let signal = Arc::clone(&arrived);
    frame_pool.FrameArrived(&TypedEventHandler::new(
        move |_pool: &Option<Direct3D11CaptureFramePool>, _| {
            signal.store(true, Ordering::SeqCst);
            Ok(())
        },
    ))?;

    session.StartCapture()?;

    let started = Instant::now();
    while !arrived.load(Ordering::SeqCst) {
        if started.elapsed() > FRAME_TIMEOUT {
            let _ = session.Close();
            let _ = frame_pool.Close();
            return Err(anyhow!("no frame within {:?}", FRAME_TIMEOUT));
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    let frame = frame_pool.TryGetNextFrame()?;
    let access: IDirect3DDxgiInterfaceAccess = frame.Surface()?.cast()?;
    let texture: ID3D11Texture2D = unsafe { access.GetInterface()? };
    let img = device.read_texture(&texture);

    session.Close()?;
    frame_pool.Close()?;

    img
}

fn capture_item_for(hwnd: HWND) -> Result<GraphicsCaptureItem> {
    let interop: IGraphicsCaptureItemInterop = unsafe {
        RoGetActivationFactory(h!("Windows.Graphics.Capture.GraphicsCaptureItem"))
            .context("GraphicsCaptureItem activation factory unavailable")?
    };
    unsafe { interop.CreateForWindow(hwnd) }.context("cannot capture this window")
}
